//! Deterministic local generator.
//!
//! Turns a [`SchemaNode`] into synthetic sample values using a seedable
//! pseudo-random source. When a seed is configured, repeated runs with the
//! same seed and schema produce identical output — a hard requirement for
//! CI usage. Generation always succeeds; unrecognized primitive kinds fall
//! through to a single lorem word.

use chrono::{DateTime, SecondsFormat};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde_json::{json, Map, Value};

use symulate_core::defaults;
use symulate_core::schema::{PrimitiveKind, SchemaNode};

// ─── Word tables ───────────────────────────────────────────────────────────

const FIRST_NAMES: &[&str] = &[
    "Ada", "Bruno", "Clara", "Dmitri", "Elena", "Felix", "Greta", "Hugo", "Iris", "Jonas",
    "Katrin", "Liam", "Mara", "Nils", "Olivia", "Pavel", "Quinn", "Rosa", "Stefan", "Tilda",
];

const LAST_NAMES: &[&str] = &[
    "Abbott", "Bergmann", "Castillo", "Durand", "Eriksen", "Fischer", "Gallagher", "Hoffmann",
    "Ivanov", "Jansen", "Keller", "Lindqvist", "Moreau", "Novak", "Okafor", "Petrov",
    "Quintana", "Rossi", "Schneider", "Tanaka",
];

const JOB_TITLES: &[&str] = &[
    "Account Executive", "Backend Engineer", "Compliance Officer", "Data Analyst",
    "Design Lead", "Field Technician", "Logistics Coordinator", "Marketing Manager",
    "Product Owner", "Support Specialist",
];

const CITIES: &[&str] = &[
    "Aarhus", "Bologna", "Cork", "Dresden", "Eindhoven", "Fukuoka", "Gdansk", "Helsinki",
    "Izmir", "Jaipur", "Kingston", "Lyon", "Malmo", "Nantes", "Oslo", "Porto",
];

const COUNTRIES: &[&str] = &[
    "Argentina", "Belgium", "Canada", "Denmark", "Estonia", "Finland", "Ghana", "Hungary",
    "Iceland", "Japan", "Kenya", "Latvia", "Mexico", "Norway", "Portugal", "Sweden",
];

const STREET_SUFFIXES: &[&str] = &["Street", "Avenue", "Lane", "Road", "Way", "Boulevard"];

const PRODUCT_ADJECTIVES: &[&str] = &[
    "Compact", "Durable", "Ergonomic", "Lightweight", "Modular", "Portable", "Rugged", "Sleek",
];

const PRODUCT_MATERIALS: &[&str] = &[
    "Aluminum", "Bamboo", "Ceramic", "Cotton", "Granite", "Leather", "Steel", "Walnut",
];

const PRODUCT_NOUNS: &[&str] = &[
    "Chair", "Desk", "Kettle", "Lamp", "Notebook", "Speaker", "Tumbler", "Watch",
];

const DEPARTMENTS: &[&str] = &[
    "Automotive", "Books", "Electronics", "Garden", "Grocery", "Home", "Outdoors", "Toys",
];

const COMPANY_SUFFIXES: &[&str] = &["GmbH", "Group", "Holdings", "Inc", "Labs", "Ltd"];

const CATCHPHRASE_VERBS: &[&str] = &[
    "Accelerate", "Harmonize", "Optimize", "Streamline", "Transform", "Unify",
];

const CATCHPHRASE_NOUNS: &[&str] = &[
    "channels", "deliverables", "experiences", "platforms", "solutions", "workflows",
];

const DOMAINS: &[&str] = &[
    "example.com", "example.net", "example.org", "mailbox.test", "webmail.test",
];

const LOREM_WORDS: &[&str] = &[
    "lorem", "ipsum", "dolor", "sit", "amet", "consectetur", "adipiscing", "elit", "sed",
    "tempor", "incididunt", "labore", "dolore", "magna", "aliqua", "veniam", "quis",
    "nostrud", "exercitation", "ullamco", "laboris", "nisi", "aliquip", "commodo",
];

// Bounds for generated date values (2020-01-01 .. 2030-01-01 UTC).
const DATE_EPOCH_MIN: i64 = 1_577_836_800;
const DATE_EPOCH_MAX: i64 = 1_893_456_000;

// ─── Generator ─────────────────────────────────────────────────────────────

/// RNG-driven schema synthesizer.
///
/// One generator per invocation: the seed (when configured) is applied at
/// construction, before any value is drawn.
pub struct Generator {
    rng: StdRng,
}

impl Generator {
    /// Create a generator, seeded when `seed` is set.
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self { rng }
    }

    /// Generate `count` samples of `schema`. `count <= 1` returns a single
    /// value, otherwise an ordered array of independently generated values.
    pub fn generate(&mut self, schema: &SchemaNode, count: usize) -> Value {
        if count <= 1 {
            self.value(schema)
        } else {
            Value::Array((0..count).map(|_| self.value(schema)).collect())
        }
    }

    fn value(&mut self, schema: &SchemaNode) -> Value {
        match schema {
            SchemaNode::Primitive { kind, .. } => self.primitive(*kind),
            SchemaNode::Object { fields, .. } => {
                let mut map = Map::new();
                for (name, field_schema) in fields {
                    map.insert(name.clone(), self.value(field_schema));
                }
                Value::Object(map)
            }
            SchemaNode::Array { element, .. } => {
                let len = self
                    .rng
                    .gen_range(defaults::ARRAY_LEN_MIN..=defaults::ARRAY_LEN_MAX);
                Value::Array((0..len).map(|_| self.value(element)).collect())
            }
        }
    }

    fn primitive(&mut self, kind: PrimitiveKind) -> Value {
        match kind {
            PrimitiveKind::Uuid => {
                let bytes: [u8; 16] = self.rng.gen();
                json!(uuid::Builder::from_random_bytes(bytes).into_uuid().to_string())
            }
            PrimitiveKind::String | PrimitiveKind::LoremWord => json!(self.word(LOREM_WORDS)),
            PrimitiveKind::Number => {
                json!(self.rng.gen_range(defaults::NUMBER_MIN..=defaults::NUMBER_MAX))
            }
            PrimitiveKind::Float => {
                let cents = self
                    .rng
                    .gen_range(defaults::NUMBER_MIN * 100..=defaults::NUMBER_MAX * 100);
                json!(cents as f64 / 100.0)
            }
            PrimitiveKind::Boolean => json!(self.rng.gen::<bool>()),
            PrimitiveKind::Date => {
                let secs = self.rng.gen_range(DATE_EPOCH_MIN..DATE_EPOCH_MAX);
                let ts = DateTime::from_timestamp(secs, 0).unwrap_or(DateTime::UNIX_EPOCH);
                json!(ts.to_rfc3339_opts(SecondsFormat::Secs, true))
            }
            PrimitiveKind::Email => {
                let first = self.word(FIRST_NAMES).to_lowercase();
                let last = self.word(LAST_NAMES).to_lowercase();
                json!(format!("{}.{}@{}", first, last, self.word(DOMAINS)))
            }
            PrimitiveKind::Url => {
                json!(format!("https://{}/{}", self.word(DOMAINS), self.word(LOREM_WORDS)))
            }
            PrimitiveKind::Phone => {
                let area = self.rng.gen_range(200..=989);
                let line = self.rng.gen_range(0..=9999);
                json!(format!("+1-{:03}-555-{:04}", area, line))
            }
            PrimitiveKind::PersonFullName => {
                json!(format!("{} {}", self.word(FIRST_NAMES), self.word(LAST_NAMES)))
            }
            PrimitiveKind::PersonFirstName => json!(self.word(FIRST_NAMES)),
            PrimitiveKind::PersonLastName => json!(self.word(LAST_NAMES)),
            PrimitiveKind::PersonJobTitle => json!(self.word(JOB_TITLES)),
            PrimitiveKind::AddressCity => json!(self.word(CITIES)),
            PrimitiveKind::AddressCountry => json!(self.word(COUNTRIES)),
            PrimitiveKind::AddressStreet => {
                let number = self.rng.gen_range(1..=999);
                let name = self.word(LAST_NAMES);
                json!(format!("{} {} {}", number, name, self.word(STREET_SUFFIXES)))
            }
            PrimitiveKind::AddressZipCode => json!(format!("{:05}", self.rng.gen_range(1000..=99999))),
            PrimitiveKind::CommercePrice => {
                let cents = self.rng.gen_range(100..=99_999);
                json!(cents as f64 / 100.0)
            }
            PrimitiveKind::CommerceProductName => {
                json!(format!(
                    "{} {} {}",
                    self.word(PRODUCT_ADJECTIVES),
                    self.word(PRODUCT_MATERIALS),
                    self.word(PRODUCT_NOUNS)
                ))
            }
            PrimitiveKind::CommerceDepartment => json!(self.word(DEPARTMENTS)),
            PrimitiveKind::CompanyName => {
                json!(format!("{} {}", self.word(LAST_NAMES), self.word(COMPANY_SUFFIXES)))
            }
            PrimitiveKind::CompanyCatchphrase => {
                json!(format!(
                    "{} your {}",
                    self.word(CATCHPHRASE_VERBS),
                    self.word(CATCHPHRASE_NOUNS)
                ))
            }
            PrimitiveKind::InternetUsername => {
                let first = self.word(FIRST_NAMES).to_lowercase();
                json!(format!("{}{}", first, self.rng.gen_range(1..=99)))
            }
            PrimitiveKind::InternetDomain => json!(self.word(DOMAINS)),
            PrimitiveKind::InternetIpv4 => {
                let octets: [u8; 4] = self.rng.gen();
                json!(format!("{}.{}.{}.{}", octets[0], octets[1], octets[2], octets[3]))
            }
            PrimitiveKind::InternetColor => {
                json!(format!("#{:06x}", self.rng.gen_range(0..0x100_0000u32)))
            }
            PrimitiveKind::LoremSentence => json!(self.sentence()),
            PrimitiveKind::LoremParagraph => {
                let sentences: Vec<String> = (0..3).map(|_| self.sentence()).collect();
                json!(sentences.join(" "))
            }
        }
    }

    fn word(&mut self, table: &[&'static str]) -> &'static str {
        table[self.rng.gen_range(0..table.len())]
    }

    fn sentence(&mut self) -> String {
        let len = self.rng.gen_range(6..=10);
        let words: Vec<&str> = (0..len).map(|_| self.word(LOREM_WORDS)).collect();
        let mut out = String::new();
        for (i, w) in words.iter().enumerate() {
            if i == 0 {
                let mut chars = w.chars();
                if let Some(c) = chars.next() {
                    out.push(c.to_ascii_uppercase());
                    out.push_str(chars.as_str());
                }
            } else {
                out.push(' ');
                out.push_str(w);
            }
        }
        out.push('.');
        out
    }
}

//! Declarative schema model for generatable values.
//!
//! A [`SchemaNode`] describes one field or subtree to synthesize: a
//! primitive kind, an object with ordered fields, or a homogeneous array.
//! The model is a closed sum type so the generator and the type-description
//! renderer match exhaustively.

use serde::de::Deserializer;
use serde::{Deserialize, Serialize};

/// Kind of a primitive schema leaf.
///
/// Covers the base kinds (uuid, string, number, ...) plus the named
/// semantic kinds that produce domain-flavored values. Parsing an
/// unrecognized name resolves to [`PrimitiveKind::LoremWord`] rather than
/// erroring, so stale declarations degrade to filler text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum PrimitiveKind {
    Uuid,
    String,
    Number,
    Float,
    Boolean,
    Date,
    Email,
    Url,
    Phone,
    PersonFullName,
    PersonFirstName,
    PersonLastName,
    PersonJobTitle,
    AddressCity,
    AddressCountry,
    AddressStreet,
    AddressZipCode,
    CommercePrice,
    CommerceProductName,
    CommerceDepartment,
    CompanyName,
    CompanyCatchphrase,
    InternetUsername,
    InternetDomain,
    InternetIpv4,
    InternetColor,
    LoremWord,
    LoremSentence,
    LoremParagraph,
}

impl PrimitiveKind {
    /// All known kinds, in declaration order.
    pub const ALL: &'static [PrimitiveKind] = &[
        Self::Uuid,
        Self::String,
        Self::Number,
        Self::Float,
        Self::Boolean,
        Self::Date,
        Self::Email,
        Self::Url,
        Self::Phone,
        Self::PersonFullName,
        Self::PersonFirstName,
        Self::PersonLastName,
        Self::PersonJobTitle,
        Self::AddressCity,
        Self::AddressCountry,
        Self::AddressStreet,
        Self::AddressZipCode,
        Self::CommercePrice,
        Self::CommerceProductName,
        Self::CommerceDepartment,
        Self::CompanyName,
        Self::CompanyCatchphrase,
        Self::InternetUsername,
        Self::InternetDomain,
        Self::InternetIpv4,
        Self::InternetColor,
        Self::LoremWord,
        Self::LoremSentence,
        Self::LoremParagraph,
    ];

    /// Canonical kebab-case name of this kind.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Uuid => "uuid",
            Self::String => "string",
            Self::Number => "number",
            Self::Float => "float",
            Self::Boolean => "boolean",
            Self::Date => "date",
            Self::Email => "email",
            Self::Url => "url",
            Self::Phone => "phone",
            Self::PersonFullName => "person-full-name",
            Self::PersonFirstName => "person-first-name",
            Self::PersonLastName => "person-last-name",
            Self::PersonJobTitle => "person-job-title",
            Self::AddressCity => "address-city",
            Self::AddressCountry => "address-country",
            Self::AddressStreet => "address-street",
            Self::AddressZipCode => "address-zip-code",
            Self::CommercePrice => "commerce-price",
            Self::CommerceProductName => "commerce-product-name",
            Self::CommerceDepartment => "commerce-department",
            Self::CompanyName => "company-name",
            Self::CompanyCatchphrase => "company-catchphrase",
            Self::InternetUsername => "internet-username",
            Self::InternetDomain => "internet-domain",
            Self::InternetIpv4 => "internet-ipv4",
            Self::InternetColor => "internet-color",
            Self::LoremWord => "lorem-word",
            Self::LoremSentence => "lorem-sentence",
            Self::LoremParagraph => "lorem-paragraph",
        }
    }

    /// Parse a kind name. Unrecognized names fall back to `LoremWord`.
    pub fn parse(name: &str) -> Self {
        Self::ALL
            .iter()
            .copied()
            .find(|k| k.name() == name)
            .unwrap_or(Self::LoremWord)
    }
}

impl std::fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

// Manual Deserialize so unknown kind names resolve to the fallback instead
// of failing the whole declaration.
impl<'de> Deserialize<'de> for PrimitiveKind {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let name = std::string::String::deserialize(deserializer)?;
        Ok(PrimitiveKind::parse(&name))
    }
}

/// Declarative description of one generatable value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SchemaNode {
    /// A leaf value of the given kind.
    Primitive {
        kind: PrimitiveKind,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        description: Option<String>,
    },
    /// A mapping of field name to sub-schema. Field order is insertion
    /// order and is preserved through generation and rendering.
    Object {
        fields: Vec<(String, SchemaNode)>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        description: Option<String>,
    },
    /// A homogeneous sequence with exactly one element schema.
    Array {
        element: Box<SchemaNode>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        description: Option<String>,
    },
}

impl SchemaNode {
    /// Leaf of the given kind.
    pub fn primitive(kind: PrimitiveKind) -> Self {
        Self::Primitive {
            kind,
            description: None,
        }
    }

    /// Object with the given fields, in declaration order.
    pub fn object<N: Into<String>>(fields: Vec<(N, SchemaNode)>) -> Self {
        Self::Object {
            fields: fields.into_iter().map(|(n, s)| (n.into(), s)).collect(),
            description: None,
        }
    }

    /// Homogeneous array of the given element schema.
    pub fn array(element: SchemaNode) -> Self {
        Self::Array {
            element: Box::new(element),
            description: None,
        }
    }

    /// Attach a generation-hint description to this node.
    pub fn described(self, description: impl Into<String>) -> Self {
        let description = Some(description.into());
        match self {
            Self::Primitive { kind, .. } => Self::Primitive { kind, description },
            Self::Object { fields, .. } => Self::Object { fields, description },
            Self::Array { element, .. } => Self::Array { element, description },
        }
    }

    /// The node's description, if any.
    pub fn description(&self) -> Option<&str> {
        match self {
            Self::Primitive { description, .. }
            | Self::Object { description, .. }
            | Self::Array { description, .. } => description.as_deref(),
        }
    }

    /// Render the schema as the human-readable type text consumed by the
    /// cache-key function and the remote generation request.
    ///
    /// Stable for a given schema: field order is declaration order and
    /// descriptions render as a parenthesized suffix.
    pub fn type_description(&self) -> String {
        let mut out = String::new();
        self.render(&mut out);
        out
    }

    fn render(&self, out: &mut String) {
        match self {
            Self::Primitive { kind, description } => {
                out.push_str(kind.name());
                if let Some(desc) = description {
                    out.push_str(" (");
                    out.push_str(desc);
                    out.push(')');
                }
            }
            Self::Object {
                fields,
                description,
            } => {
                out.push_str("{ ");
                for (i, (name, schema)) in fields.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    out.push_str(name);
                    out.push_str(": ");
                    schema.render(out);
                }
                out.push_str(" }");
                if let Some(desc) = description {
                    out.push_str(" (");
                    out.push_str(desc);
                    out.push(')');
                }
            }
            Self::Array {
                element,
                description,
            } => {
                element.render(out);
                out.push_str("[]");
                if let Some(desc) = description {
                    out.push_str(" (");
                    out.push_str(desc);
                    out.push(')');
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_names_round_trip() {
        for kind in PrimitiveKind::ALL {
            assert_eq!(PrimitiveKind::parse(kind.name()), *kind);
        }
    }

    #[test]
    fn unknown_kind_falls_back_to_lorem_word() {
        assert_eq!(PrimitiveKind::parse("quantum-flux"), PrimitiveKind::LoremWord);
        assert_eq!(PrimitiveKind::parse(""), PrimitiveKind::LoremWord);
    }

    #[test]
    fn kind_deserialize_unknown_falls_back() {
        let kind: PrimitiveKind = serde_json::from_str("\"no-such-kind\"").unwrap();
        assert_eq!(kind, PrimitiveKind::LoremWord);

        let kind: PrimitiveKind = serde_json::from_str("\"person-full-name\"").unwrap();
        assert_eq!(kind, PrimitiveKind::PersonFullName);
    }

    #[test]
    fn kind_serialize_kebab_case() {
        let json = serde_json::to_string(&PrimitiveKind::AddressZipCode).unwrap();
        assert_eq!(json, "\"address-zip-code\"");
    }

    #[test]
    fn type_description_primitive() {
        assert_eq!(
            SchemaNode::primitive(PrimitiveKind::Uuid).type_description(),
            "uuid"
        );
        assert_eq!(
            SchemaNode::primitive(PrimitiveKind::Email)
                .described("work address")
                .type_description(),
            "email (work address)"
        );
    }

    #[test]
    fn type_description_preserves_field_order() {
        let schema = SchemaNode::object(vec![
            ("id", SchemaNode::primitive(PrimitiveKind::Uuid)),
            ("name", SchemaNode::primitive(PrimitiveKind::PersonFullName)),
            ("email", SchemaNode::primitive(PrimitiveKind::Email)),
        ]);
        assert_eq!(
            schema.type_description(),
            "{ id: uuid, name: person-full-name, email: email }"
        );
    }

    #[test]
    fn type_description_nested_array() {
        let schema = SchemaNode::object(vec![(
            "tags",
            SchemaNode::array(SchemaNode::primitive(PrimitiveKind::LoremWord)),
        )]);
        assert_eq!(schema.type_description(), "{ tags: lorem-word[] }");
    }

    #[test]
    fn type_description_is_stable() {
        let schema = SchemaNode::object(vec![
            ("b", SchemaNode::primitive(PrimitiveKind::Number)),
            ("a", SchemaNode::primitive(PrimitiveKind::String)),
        ]);
        // Declaration order wins, not alphabetical order.
        assert_eq!(schema.type_description(), "{ b: number, a: string }");
        assert_eq!(schema.type_description(), schema.type_description());
    }

    #[test]
    fn schema_serde_round_trip() {
        let schema = SchemaNode::object(vec![
            ("id", SchemaNode::primitive(PrimitiveKind::Uuid)),
            (
                "orders",
                SchemaNode::array(SchemaNode::object(vec![(
                    "price",
                    SchemaNode::primitive(PrimitiveKind::CommercePrice),
                )])),
            ),
        ]);
        let json = serde_json::to_string(&schema).unwrap();
        let back: SchemaNode = serde_json::from_str(&json).unwrap();
        assert_eq!(schema, back);
    }

    #[test]
    fn described_on_each_variant() {
        let prim = SchemaNode::primitive(PrimitiveKind::Url).described("homepage");
        assert_eq!(prim.description(), Some("homepage"));

        let obj = SchemaNode::object(vec![("x", SchemaNode::primitive(PrimitiveKind::Number))])
            .described("a point");
        assert_eq!(obj.description(), Some("a point"));

        let arr =
            SchemaNode::array(SchemaNode::primitive(PrimitiveKind::Uuid)).described("id list");
        assert_eq!(arr.description(), Some("id list"));
    }
}

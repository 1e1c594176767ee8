//! Enum generation from enumeration-restricted simple types.

use crate::naming::{enum_prefix, enum_value_token, type_name};
use crate::proto::decl::{EnumDecl, EnumMember};
use std::collections::HashSet;
use xsdproto_schema::SimpleTypeDecl;

/// Generator for enum declarations.
pub struct EnumGenerator;

impl EnumGenerator {
    /// Generates the enum for a simple type, or `None` if it carries no
    /// enumeration values.
    #[must_use]
    pub fn generate(simple_type: &SimpleTypeDecl) -> Option<EnumDecl> {
        if !simple_type.is_enumeration() {
            return None;
        }

        let prefix = enum_prefix(&simple_type.name);
        let sentinel = format!("{}_UNSPECIFIED", prefix);

        let mut seen = HashSet::new();
        seen.insert(sentinel.clone());
        let mut members = vec![EnumMember {
            name: sentinel,
            number: 0,
        }];

        for value in simple_type.enumeration_values() {
            let name = format!("{}_{}", prefix, enum_value_token(value));
            if !seen.insert(name.clone()) {
                tracing::debug!("Skipping duplicate enum member {} ({:?})", name, value);
                continue;
            }
            let number = i32::try_from(members.len()).unwrap_or(i32::MAX);
            members.push(EnumMember { name, number });
        }

        Some(EnumDecl {
            name: type_name(&simple_type.name),
            members,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use xsdproto_schema::Restriction;

    fn simple_type(name: &str, values: &[&str]) -> SimpleTypeDecl {
        SimpleTypeDecl {
            name: name.to_string(),
            restriction: Some(Restriction {
                base: "xs:string".to_string(),
                enumerations: values.iter().map(|v| (*v).to_string()).collect(),
            }),
        }
    }

    fn members(decl: &EnumDecl) -> Vec<(&str, i32)> {
        decl.members
            .iter()
            .map(|m| (m.name.as_str(), m.number))
            .collect()
    }

    #[test]
    fn test_generate_enum() {
        let decl = EnumGenerator::generate(&simple_type("Status", &["OK", "FAILED-RETRY"]))
            .expect("enum");
        assert_eq!(decl.name, "Status");
        assert_eq!(
            members(&decl),
            [
                ("STATUS_UNSPECIFIED", 0),
                ("STATUS_OK", 1),
                ("STATUS_FAILED_RETRY", 2),
            ]
        );
    }

    #[test]
    fn test_sentinel_cannot_be_displaced() {
        let decl = EnumGenerator::generate(&simple_type(
            "Status",
            &["Unspecified", "OK", "unspecified"],
        ))
        .expect("enum");
        assert_eq!(
            members(&decl),
            [("STATUS_UNSPECIFIED", 0), ("STATUS_OK", 1)]
        );
    }

    #[test]
    fn test_duplicates_after_sanitizing_are_skipped() {
        let decl = EnumGenerator::generate(&simple_type(
            "ReleaseType",
            &["Audio Visual", "AudioVisual", "Audio-Visual", "1080p"],
        ))
        .expect("enum");
        assert_eq!(
            members(&decl),
            [
                ("RELEASE_TYPE_UNSPECIFIED", 0),
                ("RELEASE_TYPE_AUDIO_VISUAL", 1),
                ("RELEASE_TYPE_AUDIOVISUAL", 2),
                ("RELEASE_TYPE_E_1080P", 3),
            ]
        );
    }

    #[test]
    fn test_non_enumeration_yields_nothing() {
        assert!(EnumGenerator::generate(&simple_type("Plain", &[])).is_none());
        assert!(
            EnumGenerator::generate(&SimpleTypeDecl {
                name: "NoRestriction".to_string(),
                restriction: None,
            })
            .is_none()
        );
    }
}

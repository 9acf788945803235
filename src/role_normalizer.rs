//! Canonicalises labeler role tags onto the nine-role set.

use once_cell::sync::Lazy;
use std::collections::HashMap;
use tracing::trace;

use crate::element::{Element, Role, RoleTag};

static SYNONYMS: Lazy<HashMap<&'static str, Role>> = Lazy::new(|| {
    let table: &[(&str, Role)] = &[
        ("s", Role::S),
        ("subject", Role::S),
        ("v", Role::V),
        ("verb", Role::V),
        ("predicate", Role::V),
        ("oi", Role::Oi),
        ("indirectobject", Role::Oi),
        ("od", Role::Od),
        ("o", Role::Od),
        ("object", Role::Od),
        ("directobject", Role::Od),
        ("c", Role::C),
        ("subjectcomplement", Role::C),
        ("objectcomplement", Role::C),
        ("m", Role::M),
        ("modifier", Role::M),
        ("adverbial", Role::M),
        ("adjunct", Role::M),
        ("comp", Role::Comp),
        ("complement", Role::Comp),
        ("insert", Role::Insert),
        ("insertion", Role::Insert),
        ("parenthetical", Role::Insert),
        ("compz", Role::Compz),
        ("complementizer", Role::Compz),
    ];
    table.iter().copied().collect()
});

/// Map any role spelling onto a [`Role`]. Unknown tags become `M`, which
/// never changes a clause's arity.
pub fn normalize_role(raw: &str) -> Role {
    let key: String = raw
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '-' && *c != '_')
        .flat_map(char::to_lowercase)
        .collect();
    SYNONYMS.get(key.as_str()).copied().unwrap_or(Role::M)
}

pub struct RoleNormalizer;

impl RoleNormalizer {
    /// Replace every unrecognised tag. Returns how many changed.
    pub fn normalize(elements: &mut [Element]) -> usize {
        let mut changed = 0;
        for (index, element) in elements.iter_mut().enumerate() {
            let role = match &element.role {
                RoleTag::Unrecognized(raw) => {
                    let role = normalize_role(raw);
                    trace!(index, raw = %raw, role = %role, "normalized role");
                    role
                }
                RoleTag::Known(_) => continue,
            };
            element.role = RoleTag::Known(role);
            changed += 1;
        }
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_synonyms() {
        assert_eq!(normalize_role("Direct Object"), Role::Od);
        assert_eq!(normalize_role("indirect_object"), Role::Oi);
        assert_eq!(normalize_role(" subject "), Role::S);
        assert_eq!(normalize_role("COMP"), Role::Comp);
        assert_eq!(normalize_role("Subject-Complement"), Role::C);
        assert_eq!(normalize_role("parenthetical"), Role::Insert);
        assert_eq!(normalize_role("complementizer"), Role::Compz);
    }

    #[test]
    fn test_unknown_roles_fall_back_to_modifier() {
        assert_eq!(normalize_role("Agent"), Role::M);
        assert_eq!(normalize_role(""), Role::M);
    }

    #[test]
    fn test_normalize_elements() {
        let mut elements = vec![
            Element::new(Role::S, "She", 0, 3).with_role_tag(RoleTag::parse("subject")),
            Element::new(Role::V, "sings", 4, 9),
        ];
        assert_eq!(RoleNormalizer::normalize(&mut elements), 1);
        assert!(elements[0].is(Role::S));
        assert_eq!(RoleNormalizer::normalize(&mut elements), 0);
    }
}

use crate::inventory::report::flatten::normalize::or_placeholder;
use crate::inventory::report::model::{ChildRelation, ExpandedRule, PLACEHOLDER};

/// Protocol value matching every protocol.
pub const WILDCARD_PROTOCOL: &str = "-1";
/// Display token for [`WILDCARD_PROTOCOL`].
pub const ALL_PROTOCOLS: &str = "all";

pub fn render_protocol(protocol: &str) -> String {
    if protocol == WILDCARD_PROTOCOL {
        ALL_PROTOCOLS.to_string()
    } else {
        protocol.to_string()
    }
}

/// Expands relations into one display tuple per source.
///
/// Relations and their sources keep their input order. A relation without
/// sources still yields one row (source and annotation `-`), and an empty
/// relation list yields a single all-`-` row so the owning record stays
/// visible in the report.
pub fn expand(relations: &[ChildRelation]) -> Vec<ExpandedRule> {
    let mut rules = Vec::with_capacity(relations.len());

    for relation in relations {
        let kind = render_protocol(&relation.kind);
        let range = relation.range.to_string();

        if relation.sources.is_empty() {
            rules.push(ExpandedRule::new(kind, range, PLACEHOLDER, PLACEHOLDER));
            continue;
        }

        for source in &relation.sources {
            rules.push(ExpandedRule::new(
                kind.clone(),
                range.clone(),
                source.endpoint.clone(),
                or_placeholder(source.annotation.as_deref()),
            ));
        }
    }

    if rules.is_empty() {
        rules.push(ExpandedRule::placeholder());
    }

    rules
}

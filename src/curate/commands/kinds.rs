use crate::commands::{CmdResult, KindInfo};
use crate::config::CurateConfig;
use crate::error::Result;
use crate::schema::EntityKind;
use crate::store::DataStore;

/// Describes every collection kind with its effective field rules.
pub fn run<T, S: DataStore>(store: &S, config: &CurateConfig) -> Result<CmdResult<T>> {
    let rules = config.field_rules();
    let mut result = CmdResult::default();
    result.kinds = EntityKind::all()
        .iter()
        .map(|kind| KindInfo {
            kind: *kind,
            rules: rules.for_kind(*kind),
            parent: kind.parent_kind(),
            stored: store.exists(*kind),
        })
        .collect();
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::tests::faq_editor;
    use crate::schema::EntityRules;

    #[test]
    fn reports_rules_and_storage() {
        let (_editor, store) = faq_editor();
        let mut config = CurateConfig::default();
        config.rules.insert(EntityKind::Product, EntityRules::default());

        let result = run::<(), _>(&store, &config).unwrap();

        assert_eq!(result.kinds.len(), EntityKind::all().len());
        let faq = &result.kinds[0];
        assert_eq!(faq.kind, EntityKind::Faq);
        assert!(faq.stored);
        assert_eq!(faq.rules.required, vec!["question", "answer"]);

        let product = result.kinds.iter().find(|k| k.kind == EntityKind::Product).unwrap();
        assert!(!product.stored);
        assert!(product.rules.required.is_empty());

        let plan = result.kinds.iter().find(|k| k.kind == EntityKind::PricingPlan).unwrap();
        assert_eq!(plan.parent, Some(EntityKind::Product));
    }
}

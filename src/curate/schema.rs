//! # Field Rules
//!
//! Every collection kind is edited by the same engine; what differs between
//! FAQs, products or blog posts is captured here as data:
//!
//! - **required** fields, checked on add, update and session commit,
//! - **search** fields, matched by the search filter,
//! - an optional **slug** rule (fill `target` from `source` when left empty).
//!
//! [`FieldRules::builtin`] carries the table the site console ships with.
//! Configuration may override individual kinds (see [`crate::config`]).

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// The entity kinds the console manages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Faq,
    Product,
    PricingPlan,
    Feature,
    BlogPost,
    CookieService,
    PageSection,
    MenuItem,
    AiAgent,
}

impl EntityKind {
    pub fn all() -> &'static [EntityKind] {
        &[
            EntityKind::Faq,
            EntityKind::Product,
            EntityKind::PricingPlan,
            EntityKind::Feature,
            EntityKind::BlogPost,
            EntityKind::CookieService,
            EntityKind::PageSection,
            EntityKind::MenuItem,
            EntityKind::AiAgent,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Faq => "faq",
            EntityKind::Product => "product",
            EntityKind::PricingPlan => "pricing_plan",
            EntityKind::Feature => "feature",
            EntityKind::BlogPost => "blog_post",
            EntityKind::CookieService => "cookie_service",
            EntityKind::PageSection => "page_section",
            EntityKind::MenuItem => "menu_item",
            EntityKind::AiAgent => "ai_agent",
        }
    }

    /// The kind whose records act as parents for this kind, if it is nested.
    pub fn parent_kind(&self) -> Option<EntityKind> {
        match self {
            EntityKind::PricingPlan => Some(EntityKind::Product),
            EntityKind::MenuItem => Some(EntityKind::MenuItem),
            _ => None,
        }
    }

    /// Kinds whose children live in the same collection, one level deep
    /// (menu items and their submenu entries).
    pub fn is_two_level(&self) -> bool {
        self.parent_kind() == Some(*self)
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace('-', "_");
        EntityKind::all()
            .iter()
            .copied()
            .find(|kind| kind.as_str() == normalized || format!("{}s", kind.as_str()) == normalized)
            .ok_or_else(|| format!("Unknown collection kind: {}", s))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlugRule {
    pub source: String,
    pub target: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityRules {
    #[serde(default)]
    pub required: Vec<String>,
    #[serde(default)]
    pub search: Vec<String>,
    #[serde(default)]
    pub slug: Option<SlugRule>,
}

impl EntityRules {
    fn new(required: &[&str], search: &[&str], slug: Option<(&str, &str)>) -> Self {
        Self {
            required: required.iter().map(|s| s.to_string()).collect(),
            search: search.iter().map(|s| s.to_string()).collect(),
            slug: slug.map(|(source, target)| SlugRule {
                source: source.to_string(),
                target: target.to_string(),
            }),
        }
    }

    /// Returns the required fields that are absent or blank in `fields`.
    pub fn missing_fields(&self, fields: &Map<String, Value>) -> Vec<String> {
        self.required
            .iter()
            .filter(|name| is_blank(fields.get(name.as_str())))
            .cloned()
            .collect()
    }
}

fn is_blank(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.trim().is_empty(),
        Some(Value::Array(items)) => items.is_empty(),
        Some(_) => false,
    }
}

static BUILTIN: Lazy<BTreeMap<EntityKind, EntityRules>> = Lazy::new(|| {
    let mut table = BTreeMap::new();
    table.insert(
        EntityKind::Faq,
        EntityRules::new(&["question", "answer"], &["question", "answer", "section"], None),
    );
    table.insert(
        EntityKind::Product,
        EntityRules::new(
            &["product_name"],
            &["product_name", "product_description"],
            Some(("product_name", "slug")),
        ),
    );
    table.insert(
        EntityKind::PricingPlan,
        EntityRules::new(
            &["package", "price"],
            &["package", "description"],
            Some(("package", "slug")),
        ),
    );
    table.insert(
        EntityKind::Feature,
        EntityRules::new(&["name"], &["name", "content"], Some(("name", "slug"))),
    );
    table.insert(
        EntityKind::BlogPost,
        EntityRules::new(&["title"], &["title", "description"], Some(("title", "slug"))),
    );
    table.insert(
        EntityKind::CookieService,
        EntityRules::new(
            &["name", "description", "category"],
            &["name", "description", "category"],
            None,
        ),
    );
    table.insert(
        EntityKind::PageSection,
        EntityRules::new(&["title"], &["title"], None),
    );
    table.insert(
        EntityKind::MenuItem,
        EntityRules::new(
            &["display_name", "url_name"],
            &["display_name", "url_name", "description"],
            None,
        ),
    );
    table.insert(
        EntityKind::AiAgent,
        EntityRules::new(&["name"], &["name", "role", "system_message"], None),
    );
    table
});

/// Per-kind rule table handed to the collection store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldRules {
    rules: BTreeMap<EntityKind, EntityRules>,
}

impl Default for FieldRules {
    fn default() -> Self {
        Self::builtin()
    }
}

impl FieldRules {
    pub fn builtin() -> Self {
        Self {
            rules: BUILTIN.clone(),
        }
    }

    pub fn empty() -> Self {
        Self {
            rules: BTreeMap::new(),
        }
    }

    pub fn with_rules(mut self, kind: EntityKind, rules: EntityRules) -> Self {
        self.rules.insert(kind, rules);
        self
    }

    /// Applies overrides on top of this table, kind by kind.
    pub fn merged(mut self, overrides: &BTreeMap<EntityKind, EntityRules>) -> Self {
        for (kind, rules) in overrides {
            self.rules.insert(*kind, rules.clone());
        }
        self
    }

    pub fn for_kind(&self, kind: EntityKind) -> EntityRules {
        self.rules.get(&kind).cloned().unwrap_or_default()
    }
}

//! Entity field sets for the collections the site console edits.
//!
//! Ordering, identity and parent scope live on [`crate::model::OrderedRecord`];
//! these structs only carry the editable fields. Every struct deserializes
//! with defaults so partially filled drafts and older files still load.

use crate::model::Entity;
use crate::schema::EntityKind;
use serde::{Deserialize, Serialize};

fn or_untitled(label: &str) -> String {
    if label.trim().is_empty() {
        "(untitled)".to_string()
    } else {
        label.to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Faq {
    pub question: String,
    pub answer: String,
    pub section: String,
    pub display_home_page: bool,
}

impl Default for Faq {
    fn default() -> Self {
        Self {
            question: String::new(),
            answer: String::new(),
            section: String::new(),
            display_home_page: true,
        }
    }
}

impl Entity for Faq {
    const KIND: EntityKind = EntityKind::Faq;

    fn label(&self) -> String {
        or_untitled(&self.question)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Product {
    pub product_name: String,
    pub slug: String,
    pub product_description: String,
    pub links_to_image: String,
    pub price_manual: String,
    pub currency_manual_symbol: String,
    pub is_displayed: bool,
}

impl Default for Product {
    fn default() -> Self {
        Self {
            product_name: String::new(),
            slug: String::new(),
            product_description: String::new(),
            links_to_image: String::new(),
            price_manual: String::new(),
            currency_manual_symbol: "$".to_string(),
            is_displayed: true,
        }
    }
}

impl Entity for Product {
    const KIND: EntityKind = EntityKind::Product;

    fn label(&self) -> String {
        or_untitled(&self.product_name)
    }
}

/// A pricing plan, nested under its product's identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PricingPlan {
    pub package: String,
    pub slug: String,
    pub description: String,
    pub price: Option<f64>,
    pub currency: String,
    pub currency_symbol: String,
    pub recurring_interval: Option<String>,
    pub is_active: bool,
}

impl Default for PricingPlan {
    fn default() -> Self {
        Self {
            package: String::new(),
            slug: String::new(),
            description: String::new(),
            price: None,
            currency: "usd".to_string(),
            currency_symbol: "$".to_string(),
            recurring_interval: None,
            is_active: true,
        }
    }
}

impl Entity for PricingPlan {
    const KIND: EntityKind = EntityKind::PricingPlan;

    fn label(&self) -> String {
        or_untitled(&self.package)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Feature {
    pub name: String,
    pub slug: String,
    pub content: String,
    pub feature_image: String,
    pub display_content: bool,
    pub display_on_product_card: bool,
}

impl Default for Feature {
    fn default() -> Self {
        Self {
            name: String::new(),
            slug: String::new(),
            content: String::new(),
            feature_image: String::new(),
            display_content: true,
            display_on_product_card: false,
        }
    }
}

impl Entity for Feature {
    const KIND: EntityKind = EntityKind::Feature;

    fn label(&self) -> String {
        or_untitled(&self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlogPost {
    pub title: String,
    pub slug: String,
    pub description: String,
    pub content: String,
    pub display_this_post: bool,
    pub display_as_blog_post: bool,
}

impl Default for BlogPost {
    fn default() -> Self {
        Self {
            title: String::new(),
            slug: String::new(),
            description: String::new(),
            content: String::new(),
            display_this_post: true,
            display_as_blog_post: true,
        }
    }
}

impl Entity for BlogPost {
    const KIND: EntityKind = EntityKind::BlogPost;

    fn label(&self) -> String {
        or_untitled(&self.title)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CookieService {
    pub name: String,
    pub description: String,
    pub category: String,
    pub active: bool,
}

impl Default for CookieService {
    fn default() -> Self {
        Self {
            name: String::new(),
            description: String::new(),
            category: String::new(),
            active: true,
        }
    }
}

impl Entity for CookieService {
    const KIND: EntityKind = EntityKind::CookieService;

    fn label(&self) -> String {
        or_untitled(&self.name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionType {
    Hero,
    #[default]
    TemplateSection,
    HeadingSection,
}

/// A landing page section, ordered by the layout manager.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageSection {
    #[serde(rename = "type")]
    pub section_type: SectionType,
    pub title: String,
}

impl Entity for PageSection {
    const KIND: EntityKind = EntityKind::PageSection;

    fn label(&self) -> String {
        or_untitled(&self.title)
    }
}

/// An entry of the site navigation.
///
/// Menu items form a two-level list inside one collection: top-level records
/// are the menu, records nested under a menu item are its submenu entries,
/// ordered within that item. Both levels share this field set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MenuItem {
    pub display_name: String,
    pub url_name: String,
    pub description: String,
    pub image: String,
    pub is_displayed: bool,
    pub is_displayed_on_footer: bool,
    pub is_new_window: bool,
}

impl Default for MenuItem {
    fn default() -> Self {
        Self {
            display_name: String::new(),
            url_name: String::new(),
            description: String::new(),
            image: String::new(),
            is_displayed: true,
            is_displayed_on_footer: false,
            is_new_window: false,
        }
    }
}

impl Entity for MenuItem {
    const KIND: EntityKind = EntityKind::MenuItem;

    fn label(&self) -> String {
        or_untitled(&self.display_name)
    }
}

pub const DEFAULT_AGENT_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AiAgent {
    pub name: String,
    pub api_key: String,
    pub endpoint: String,
    pub max_tokens: u32,
    pub system_message: String,
    pub user_role_to_access: String,
    pub is_active: bool,
    pub icon: String,
    pub role: String,
    /// Free-form task description; any JSON value.
    pub task: serde_json::Value,
}

impl Default for AiAgent {
    fn default() -> Self {
        Self {
            name: String::new(),
            api_key: String::new(),
            endpoint: DEFAULT_AGENT_ENDPOINT.to_string(),
            max_tokens: 1000,
            system_message: "You are a helpful assistant.".to_string(),
            user_role_to_access: "user".to_string(),
            is_active: true,
            icon: "🤖".to_string(),
            role: "assistant".to_string(),
            task: serde_json::Value::Null,
        }
    }
}

impl Entity for AiAgent {
    const KIND: EntityKind = EntityKind::AiAgent;

    fn label(&self) -> String {
        or_untitled(&self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_fills_defaults() {
        let product: Product = serde_json::from_str(r#"{"product_name": "Pro"}"#).unwrap();
        assert_eq!(product.product_name, "Pro");
        assert!(product.is_displayed);
        assert_eq!(product.currency_manual_symbol, "$");
    }

    #[test]
    fn explicit_false_is_kept() {
        let faq: Faq = serde_json::from_str(r#"{"display_home_page": false}"#).unwrap();
        assert!(!faq.display_home_page);
    }

    #[test]
    fn section_type_uses_wire_name() {
        let section: PageSection =
            serde_json::from_str(r#"{"type": "hero", "title": "Top"}"#).unwrap();
        assert_eq!(section.section_type, SectionType::Hero);
    }

    #[test]
    fn blank_labels_render_untitled() {
        assert_eq!(Feature::default().label(), "(untitled)");
        let post = BlogPost {
            title: "Launch".into(),
            ..BlogPost::default()
        };
        assert_eq!(post.label(), "Launch");
    }

    #[test]
    fn agent_defaults_fill_missing_fields() {
        let agent: AiAgent =
            serde_json::from_str(r#"{"name": "Helper", "task": {"steps": 2}}"#).unwrap();
        assert_eq!(agent.endpoint, DEFAULT_AGENT_ENDPOINT);
        assert_eq!(agent.max_tokens, 1000);
        assert!(agent.is_active);
        assert_eq!(agent.task["steps"], 2);
    }

    #[test]
    fn menu_item_defaults_match_the_add_form() {
        let item = MenuItem::default();
        assert!(item.is_displayed);
        assert!(!item.is_displayed_on_footer);
        assert!(!item.is_new_window);
    }
}

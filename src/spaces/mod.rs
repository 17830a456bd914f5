use serde::{Deserialize, Serialize};

use crate::api::{AdminApi, ApiResult};
use crate::icons::AppIcon;
use crate::reorder::{move_and_renumber, ReorderResult, Sortable};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpaceMenuItem {
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub icon: Option<AppIcon>,
    #[serde(default)]
    pub data_model_id: Option<String>,
    #[serde(default)]
    pub sort_order: i64,
}

impl Sortable for SpaceMenuItem {
    fn id(&self) -> &str {
        &self.id
    }

    fn sort_order(&self) -> i64 {
        self.sort_order
    }

    fn set_sort_order(&mut self, sort_order: i64) {
        self.sort_order = sort_order;
    }
}

/// Sidebar menu of one space. Ordering is persisted by replacing the whole
/// list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpaceMenu {
    space_id: String,
    items: Vec<SpaceMenuItem>,
}

impl SpaceMenu {
    pub fn new(space_id: impl Into<String>, mut items: Vec<SpaceMenuItem>) -> Self {
        items.sort_by_key(|item| item.sort_order);
        Self {
            space_id: space_id.into(),
            items,
        }
    }

    pub fn space_id(&self) -> &str {
        &self.space_id
    }

    pub fn items(&self) -> &[SpaceMenuItem] {
        &self.items
    }

    pub fn move_item(&mut self, from: usize, to: usize) -> ReorderResult<()> {
        move_and_renumber(&mut self.items, from, to).map(|_| ())
    }

    pub fn persist(&self, api: &impl AdminApi) -> ApiResult<()> {
        api.replace_menu_items(&self.space_id, &self.items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{ApiCall, FakeAdminApi};

    fn item(id: &str, sort_order: i64) -> SpaceMenuItem {
        SpaceMenuItem {
            id: id.to_string(),
            label: id.to_uppercase(),
            icon: None,
            data_model_id: None,
            sort_order,
        }
    }

    #[test]
    fn menu_is_ordered_by_sort_order_on_construction() {
        let menu = SpaceMenu::new("s1", vec![item("b", 20), item("a", 10)]);
        let ids: Vec<&str> = menu.items().iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, ["a", "b"]);
    }

    #[test]
    fn moving_renumbers_and_persists_the_whole_list() {
        let api = FakeAdminApi::new();
        let mut menu = SpaceMenu::new("s1", vec![item("a", 1), item("b", 2), item("c", 3)]);
        menu.move_item(0, 2).unwrap();
        menu.persist(&api).unwrap();

        let orders: Vec<(&str, i64)> = menu
            .items()
            .iter()
            .map(|i| (i.id.as_str(), i.sort_order))
            .collect();
        assert_eq!(orders, [("b", 100), ("c", 200), ("a", 300)]);
        assert_eq!(
            api.calls(),
            vec![ApiCall::ReplaceMenuItems {
                space_id: "s1".to_string(),
                ids: vec!["b".to_string(), "c".to_string(), "a".to_string()],
            }]
        );
    }

    #[test]
    fn bad_move_leaves_the_menu_untouched() {
        let mut menu = SpaceMenu::new("s1", vec![item("a", 1)]);
        let before = menu.clone();
        assert!(menu.move_item(0, 1).is_err());
        assert_eq!(menu, before);
    }
}

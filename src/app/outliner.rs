use super::Editor;
use crate::catalog::light_asset;
use crate::scene::SceneObjectId;

#[derive(Debug, Clone, PartialEq)]
pub struct OutlinerRow {
    pub id: SceneObjectId,
    pub name: String,
    /// First id group, enough to tell rows apart.
    pub short_id: String,
    pub is_light: bool,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct OutlinerView {
    pub rows: Vec<OutlinerRow>,
    /// Every actor in the scene, filtered or not.
    pub actor_count: usize,
}

impl OutlinerView {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl Editor {
    /// Rows whose name or id contains `filter`, case-insensitively, in insertion order.
    pub fn outliner(&self, filter: &str) -> OutlinerView {
        let needle = filter.trim().to_lowercase();
        let rows = self
            .store
            .iter()
            .filter(|object| {
                needle.is_empty()
                    || object.name.to_lowercase().contains(&needle)
                    || object.id.to_string().contains(&needle)
            })
            .map(|object| {
                let id = object.id.to_string();
                OutlinerRow {
                    id: object.id,
                    name: object.name.clone(),
                    short_id: format!("{}..", id.split('-').next().unwrap_or_default()),
                    is_light: light_asset(&object.asset_id).is_some(),
                    selected: self.state.selected == Some(object.id),
                }
            })
            .collect();
        OutlinerView { rows, actor_count: self.store.len() }
    }
}

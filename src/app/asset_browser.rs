use super::Editor;
use crate::catalog::{assets_of_kind, Asset, AssetKind};

const SECTION_ORDER: [(AssetKind, &str); 4] = [
    (AssetKind::Mesh, "Primitives"),
    (AssetKind::Light, "Lights"),
    (AssetKind::Material, "Materials"),
    (AssetKind::Physics, "Physics"),
];

#[derive(Debug, Clone, PartialEq)]
pub struct AssetTile {
    pub asset: Asset,
    /// Meshes and lights can be dragged into the viewport; the rest are click-to-assign.
    pub draggable: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AssetBrowserSection {
    pub kind: AssetKind,
    pub title: &'static str,
    pub tiles: Vec<AssetTile>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AssetBrowserView {
    pub sections: Vec<AssetBrowserSection>,
}

impl AssetBrowserView {
    /// Catalog grouped by kind, keeping assets whose name or id contains `search`.
    /// Sections left empty by the search are dropped.
    pub fn build(search: &str) -> Self {
        let needle = search.trim().to_lowercase();
        let sections = SECTION_ORDER
            .iter()
            .filter_map(|(kind, title)| {
                let tiles: Vec<AssetTile> = assets_of_kind(*kind)
                    .filter(|asset| {
                        needle.is_empty()
                            || asset.name().to_lowercase().contains(&needle)
                            || asset.id().contains(&needle)
                    })
                    .map(|asset| AssetTile { draggable: asset.is_placeable(), asset })
                    .collect();
                (!tiles.is_empty()).then_some(AssetBrowserSection { kind: *kind, title, tiles })
            })
            .collect();
        Self { sections }
    }

    pub fn tile_count(&self) -> usize {
        self.sections.iter().map(|section| section.tiles.len()).sum()
    }
}

impl Editor {
    /// Hidden in Play.
    pub fn asset_browser(&self, search: &str) -> Option<AssetBrowserView> {
        self.state.mode.shows_sidebars().then(|| AssetBrowserView::build(search))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unfiltered_browser_lists_whole_catalog_in_section_order() {
        let view = AssetBrowserView::build("");
        let titles: Vec<&str> = view.sections.iter().map(|section| section.title).collect();
        assert_eq!(titles, ["Primitives", "Lights", "Materials", "Physics"]);
        assert_eq!(view.tile_count(), 5 + 3 + 7 + 4);
        assert!(view.sections[0].tiles.iter().all(|tile| tile.draggable));
        assert!(view.sections[2].tiles.iter().all(|tile| !tile.draggable));
    }

    #[test]
    fn search_filters_and_drops_empty_sections() {
        let view = AssetBrowserView::build("ICE");
        assert_eq!(view.sections.len(), 2);
        assert!(view.sections.iter().all(|section| section.tiles.iter().all(|tile| tile.asset.id().contains("ice"))));
        assert!(AssetBrowserView::build("zzz").sections.is_empty());
    }
}

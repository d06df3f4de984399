use crate::error::DashboardError;
use crate::layout::{page_layout, PageLayout};
use crate::loader::Dataset;
use crate::models::RecordKey;
use crate::render;
use crate::selection::{ColumnChoice, Selection};
use crate::signal::{Patch, Region, Signal};

/// Loaded survey plus the two page signals and their renderers.
pub struct Dashboard {
    dataset: Dataset,
    initial_column: ColumnChoice,
    column: Signal<ColumnChoice>,
    selection: Signal<Selection>,
}

impl Dashboard {
    pub fn new(dataset: Dataset) -> Result<Self, DashboardError> {
        let initial_column = ColumnChoice::initial(&dataset)?;
        let column: Signal<ColumnChoice> =
            Signal::new("column").subscribe(Region::Histogram, render::histogram);
        let selection: Signal<Selection> = Signal::new("selection")
            .subscribe(Region::Radar, render::radar)
            .subscribe(Region::Heatmap, render::heatmap)
            .subscribe(Region::InfoCards, render::info_cards);

        Ok(Dashboard {
            dataset,
            initial_column,
            column,
            selection,
        })
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn layout(&self) -> PageLayout {
        let mut regions = self.column.regions();
        regions.extend(self.selection.regions());
        page_layout(&self.dataset, &self.initial_column, regions)
    }

    pub fn choose_column(&self, name: &str) -> Result<Vec<Patch>, DashboardError> {
        let choice = ColumnChoice::new(&self.dataset, name)?;
        Ok(self.column.emit(&self.dataset, &choice))
    }

    /// Renders the selected members the table is currently showing. With no
    /// `visible` list every selected member counts as shown.
    pub fn select(
        &self,
        keys: &[RecordKey],
        visible: Option<&[RecordKey]>,
    ) -> Result<Vec<Patch>, DashboardError> {
        let mut selection = Selection::from_keys(&self.dataset, keys)?;
        if let Some(visible) = visible {
            selection = selection.within_view(&self.dataset, visible);
        }
        Ok(self.selection.emit(&self.dataset, &selection))
    }

    /// Everything the page shows before the first interaction.
    pub fn initial_patches(&self) -> Vec<Patch> {
        let mut patches = self.column.emit(&self.dataset, &self.initial_column);
        patches.extend(self.selection.emit(&self.dataset, &Selection::empty()));
        patches
    }
}

use serde::Serialize;

use crate::figure::Figure;
use crate::loader::Dataset;
use crate::render::InfoCard;

/// Output areas of the page, named by their element ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Region {
    #[serde(rename = "histogram-chart")]
    Histogram,
    #[serde(rename = "radar-chart")]
    Radar,
    #[serde(rename = "heatmap-chart")]
    Heatmap,
    #[serde(rename = "infocard-container")]
    InfoCards,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "body", rename_all = "snake_case")]
pub enum Fragment {
    Figure(Figure),
    Cards(Vec<InfoCard>),
    Notice(String),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Patch {
    pub region: Region,
    pub fragment: Fragment,
}

pub type Render<T> = fn(&Dataset, &T) -> Fragment;

struct Subscriber<T> {
    region: Region,
    render: Render<T>,
}

/// A value the page can change, with the renderers that react to it.
/// Subscribers only see the dataset and the value, never each other's output.
pub struct Signal<T> {
    name: &'static str,
    subscribers: Vec<Subscriber<T>>,
}

impl<T> Signal<T> {
    pub fn new(name: &'static str) -> Self {
        Signal {
            name,
            subscribers: Vec::new(),
        }
    }

    pub fn subscribe(mut self, region: Region, render: Render<T>) -> Self {
        self.subscribers.push(Subscriber { region, render });
        self
    }

    pub fn regions(&self) -> Vec<Region> {
        self.subscribers.iter().map(|s| s.region).collect()
    }

    /// Re-renders every subscribed region, in subscription order.
    pub fn emit(&self, dataset: &Dataset, value: &T) -> Vec<Patch> {
        tracing::debug!(
            signal = self.name,
            subscribers = self.subscribers.len(),
            "signal changed"
        );
        self.subscribers
            .iter()
            .map(|subscriber| Patch {
                region: subscriber.region,
                fragment: (subscriber.render)(dataset, value),
            })
            .collect()
    }
}

use clap::ValueEnum;
use flowmap_index::IndexFilter;
use flowmap_render::FlowmapConfig;
use std::str::FromStr;

#[derive(Copy, Clone, ValueEnum)]
pub(crate) enum TokenMatchFlag {
    Same,
    Different,
}

impl TokenMatchFlag {
    pub(crate) const fn as_domain(self) -> bool {
        matches!(self, TokenMatchFlag::Same)
    }
}

#[derive(Copy, Clone, ValueEnum)]
pub(crate) enum PresetFlag {
    Default,
    Compact,
    Presentation,
}

impl PresetFlag {
    pub(crate) fn as_domain(self) -> FlowmapConfig {
        match self {
            PresetFlag::Default => FlowmapConfig::default(),
            PresetFlag::Compact => FlowmapConfig::compact(),
            PresetFlag::Presentation => FlowmapConfig::presentation(),
        }
    }
}

/// `N` or `A:B`, inclusive, in either order.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) struct IndexSpan {
    pub start: usize,
    pub end: usize,
}

impl IndexSpan {
    pub(crate) fn filter(self) -> IndexFilter {
        IndexFilter::range(self.start, self.end)
    }
}

impl FromStr for IndexSpan {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let parse = |part: &str| {
            part.trim()
                .parse::<usize>()
                .map_err(|_| format!("'{part}' is not a token index"))
        };
        match raw.split_once(':') {
            Some((a, b)) => Ok(Self {
                start: parse(a)?,
                end: parse(b)?,
            }),
            None => {
                let index = parse(raw)?;
                Ok(Self {
                    start: index,
                    end: index,
                })
            }
        }
    }
}

use rand::Rng;

use super::catalog::Catalog;
use super::episode::Episode;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Pick {
    pub(crate) series: String,
    pub(crate) episode: Episode,
    pub(crate) op: Option<Episode>,
    pub(crate) ed: Option<Episode>,
}

impl Pick {
    pub(crate) fn playlist(&self) -> Vec<&str> {
        self.op
            .iter()
            .chain(std::iter::once(&self.episode))
            .chain(self.ed.iter())
            .map(|episode| episode.filename.as_str())
            .collect()
    }
}

pub(crate) struct Selection<R> {
    catalog: Catalog,
    // One series name per numbered episode not yet drawn.
    pool: Vec<String>,
    total: usize,
    rng: R,
}

impl<R: Rng> Selection<R> {
    pub(crate) fn new(catalog: Catalog, rng: R) -> Self {
        let pool = catalog
            .series()
            .flat_map(|series| series.episodes.iter().map(|_| series.name.clone()))
            .collect::<Vec<_>>();
        Self {
            total: pool.len(),
            catalog,
            pool,
            rng,
        }
    }

    pub(crate) fn has_next(&self) -> bool {
        !self.pool.is_empty()
    }

    pub(crate) fn total(&self) -> usize {
        self.total
    }

    pub(crate) fn next(&mut self) -> Option<Pick> {
        if self.pool.is_empty() {
            return None;
        }
        let index = self.rng.gen_range(0..self.pool.len());
        let name = self.pool.swap_remove(index);
        let series = self.catalog.get_mut(&name)?;
        let episode = series.pop_next()?;
        Some(Pick {
            series: name,
            episode,
            op: series.op.clone(),
            ed: series.ed.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;
    use crate::app::catalog::{DirEntryInfo, build_catalog};
    use crate::app::episode::EpisodeNumber;

    fn catalog(names: &[&str]) -> Catalog {
        build_catalog(names.iter().map(|name| DirEntryInfo::file(name))).catalog
    }

    fn sample_catalog() -> Catalog {
        catalog(&[
            "Bento - 01.mkv",
            "Bento - 02.mkv",
            "Bento - 03.mkv",
            "Bento OP.mkv",
            "Bento ED.mkv",
            "Yuru Camp - 05.mkv",
            "Yuru Camp - 04.mkv",
            "Eizouken.mkv",
            "Orphan OP.mkv",
        ])
    }

    fn drain(seed: u64) -> Vec<Pick> {
        let mut selection = Selection::new(sample_catalog(), StdRng::seed_from_u64(seed));
        let mut picks = Vec::new();
        while selection.has_next() {
            picks.push(selection.next().expect("pool not exhausted"));
        }
        assert!(selection.next().is_none());
        picks
    }

    #[test]
    fn session_length_is_total_numbered_episodes() {
        let selection = Selection::new(sample_catalog(), StdRng::seed_from_u64(7));
        assert_eq!(selection.total(), 6);

        for seed in 0..20 {
            assert_eq!(drain(seed).len(), 6, "seed {seed}");
        }
    }

    #[test]
    fn each_series_plays_in_ascending_order() {
        for seed in 0..50 {
            let mut seen: HashMap<String, Vec<u64>> = HashMap::new();
            for pick in drain(seed) {
                let number = pick.episode.number.number().expect("only numbered draws");
                seen.entry(pick.series).or_default().push(number);
            }
            assert_eq!(seen["Bento"], vec![1, 2, 3], "seed {seed}");
            assert_eq!(seen["Yuru Camp"], vec![4, 5], "seed {seed}");
            assert_eq!(seen["Eizouken"], vec![0], "seed {seed}");
            assert!(!seen.contains_key("Orphan"), "seed {seed}");
        }
    }

    #[test]
    fn clips_ride_along_and_are_never_drawn() {
        for pick in drain(3) {
            assert!(matches!(pick.episode.number, EpisodeNumber::Numbered(_)));
            if pick.series == "Bento" {
                let playlist = pick.playlist();
                assert_eq!(playlist.len(), 3);
                assert_eq!(playlist[0], "Bento OP.mkv");
                assert_eq!(playlist[2], "Bento ED.mkv");
            } else {
                assert_eq!(pick.playlist(), vec![pick.episode.filename.as_str()]);
            }
        }
    }

    #[test]
    fn draw_order_varies_between_seeds() {
        let orders = (0..20)
            .map(|seed| {
                drain(seed)
                    .into_iter()
                    .map(|pick| pick.episode.filename)
                    .collect::<Vec<_>>()
            })
            .collect::<Vec<_>>();
        assert!(orders.iter().any(|order| order != &orders[0]));
    }

    #[test]
    fn empty_catalog_has_nothing_to_draw() {
        let mut selection = Selection::new(Catalog::default(), StdRng::seed_from_u64(1));
        assert!(!selection.has_next());
        assert_eq!(selection.total(), 0);
        assert!(selection.next().is_none());
    }
}

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use super::episode::{Episode, EpisodeNumber};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct DirEntryInfo {
    pub(crate) name: String,
    pub(crate) is_dir: bool,
}

impl DirEntryInfo {
    #[cfg(test)]
    pub(crate) fn file(name: &str) -> Self {
        Self {
            name: name.to_string(),
            is_dir: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Series {
    pub(crate) name: String,
    pub(crate) episodes: Vec<Episode>,
    pub(crate) op: Option<Episode>,
    pub(crate) ed: Option<Episode>,
}

impl Series {
    pub(crate) fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            episodes: Vec::new(),
            op: None,
            ed: None,
        }
    }

    pub(crate) fn append(&mut self, episode: Episode) -> Option<Episode> {
        match episode.number {
            EpisodeNumber::Opening => self.op.replace(episode),
            EpisodeNumber::Ending => self.ed.replace(episode),
            EpisodeNumber::Numbered(_) => {
                self.episodes.push(episode);
                // Stable, so equal numbers keep insertion order.
                self.episodes.sort_by_key(|episode| episode.number.number());
                None
            }
        }
    }

    pub(crate) fn pop_next(&mut self) -> Option<Episode> {
        if self.episodes.is_empty() {
            None
        } else {
            Some(self.episodes.remove(0))
        }
    }
}

impl fmt::Display for Series {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let numbers = self
            .episodes
            .iter()
            .map(|episode| episode.number.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        write!(f, "{} [{numbers}]", self.name)?;
        if self.op.is_some() {
            f.write_str(" OP")?;
        }
        if self.ed.is_some() {
            f.write_str(" ED")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct Catalog {
    series: BTreeMap<String, Series>,
}

impl Catalog {
    pub(crate) fn insert(&mut self, episode: Episode) -> Option<Episode> {
        self.series
            .entry(episode.series.clone())
            .or_insert_with(|| Series::new(&episode.series))
            .append(episode)
    }

    pub(crate) fn series(&self) -> impl Iterator<Item = &Series> {
        self.series.values()
    }

    #[cfg(test)]
    pub(crate) fn get(&self, name: &str) -> Option<&Series> {
        self.series.get(name)
    }

    pub(crate) fn get_mut(&mut self, name: &str) -> Option<&mut Series> {
        self.series.get_mut(name)
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.series.len()
    }

    pub(crate) fn total_episodes(&self) -> usize {
        self.series.values().map(|series| series.episodes.len()).sum()
    }
}

#[derive(Debug, Default)]
pub(crate) struct CatalogBuild {
    pub(crate) catalog: Catalog,
    pub(crate) warnings: Vec<String>,
}

pub(crate) fn build_catalog<I>(entries: I) -> CatalogBuild
where
    I: IntoIterator<Item = DirEntryInfo>,
{
    let mut build = CatalogBuild::default();

    for entry in entries {
        if entry.name.starts_with('.') {
            continue;
        }
        let episode = match Episode::from_entry(&entry.name, entry.is_dir) {
            Ok(episode) => episode,
            Err(err) => {
                if err.is_reportable() {
                    build.warnings.push(err.to_string());
                }
                continue;
            }
        };

        let slot = episode.number;
        let series = episode.series.clone();
        let filename = episode.filename.clone();
        if let Some(displaced) = build.catalog.insert(episode) {
            build.warnings.push(format!(
                "{filename} replaces {} as the {slot} for {series}",
                displaced.filename
            ));
        }
    }

    for series in build.catalog.series() {
        if series.episodes.is_empty() {
            build.warnings.push(format!(
                "{} has no numbered episodes; its OP/ED will never play",
                series.name
            ));
        }
    }

    build
}

pub(crate) fn scan_directory(root: &Path) -> Result<(Vec<DirEntryInfo>, Vec<String>)> {
    let mut entries = Vec::new();
    let mut warnings = Vec::new();

    let read_dir =
        fs::read_dir(root).with_context(|| format!("failed to list {}", root.display()))?;
    for entry in read_dir {
        let entry = entry.with_context(|| format!("failed to list {}", root.display()))?;
        let name = match entry.file_name().into_string() {
            Ok(name) => name,
            Err(raw) => {
                warnings.push(format!("skipping non-UTF-8 file name {raw:?}"));
                continue;
            }
        };
        let is_dir = fs::metadata(entry.path())
            .map(|meta| meta.is_dir())
            .or_else(|_| entry.file_type().map(|kind| kind.is_dir()))
            .unwrap_or(false);
        entries.push(DirEntryInfo { name, is_dir });
    }

    entries.sort_by(|left, right| left.name.cmp(&right.name));
    Ok((entries, warnings))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn files(names: &[&str]) -> Vec<DirEntryInfo> {
        names.iter().map(|name| DirEntryInfo::file(name)).collect()
    }

    #[test]
    fn groups_episodes_with_opening_and_ending() {
        let build = build_catalog(files(&[
            "Bento - 02.mkv",
            "Bento OP.mkv",
            "Bento - 01.mkv",
            "Bento ED.mkv",
        ]));
        assert!(build.warnings.is_empty(), "{:?}", build.warnings);
        assert_eq!(build.catalog.len(), 1);

        let series = build.catalog.get("Bento").expect("series exists");
        let numbers = series
            .episodes
            .iter()
            .map(|episode| episode.number)
            .collect::<Vec<_>>();
        assert_eq!(
            numbers,
            vec![EpisodeNumber::Numbered(1), EpisodeNumber::Numbered(2)]
        );
        assert_eq!(
            series.op.as_ref().map(|op| op.filename.as_str()),
            Some("Bento OP.mkv")
        );
        assert_eq!(
            series.ed.as_ref().map(|ed| ed.filename.as_str()),
            Some("Bento ED.mkv")
        );
        assert_eq!(series.to_string(), "Bento [1, 2] OP ED");
        assert_eq!(build.catalog.total_episodes(), 2);
    }

    #[test]
    fn hidden_directories_and_junk_are_skipped_without_warnings() {
        let mut entries = files(&[".Bento - 03.mkv", "randomjunk", "notes.txt"]);
        entries.push(DirEntryInfo {
            name: "consumed".to_string(),
            is_dir: true,
        });
        let build = build_catalog(entries);
        assert_eq!(build.catalog.len(), 0);
        assert!(build.warnings.is_empty(), "{:?}", build.warnings);
    }

    #[test]
    fn unparseable_video_is_reported_and_excluded() {
        let build = build_catalog(files(&["[Group].mkv", "Bento - 01.mkv"]));
        assert_eq!(build.catalog.len(), 1);
        assert_eq!(build.warnings.len(), 1);
        assert!(build.warnings[0].contains("[Group].mkv"));
    }

    #[test]
    fn later_opening_overwrites_earlier_one_with_a_warning() {
        let build = build_catalog(files(&["Bento OP1.mkv", "Bento OP2.mkv", "Bento - 01.mkv"]));
        let series = build.catalog.get("Bento").expect("series exists");
        assert_eq!(
            series.op.as_ref().map(|op| op.filename.as_str()),
            Some("Bento OP2.mkv")
        );
        assert_eq!(
            build.warnings,
            vec!["Bento OP2.mkv replaces Bento OP1.mkv as the OP for Bento".to_string()]
        );
    }

    #[test]
    fn duplicate_numbers_are_both_kept_in_insertion_order() {
        let build = build_catalog(files(&["Bento - 01.mkv", "Bento - 01v2.mkv"]));
        let series = build.catalog.get("Bento").expect("series exists");
        let names = series
            .episodes
            .iter()
            .map(|episode| episode.filename.as_str())
            .collect::<Vec<_>>();
        assert_eq!(names, vec!["Bento - 01.mkv", "Bento - 01v2.mkv"]);
    }

    #[test]
    fn series_with_only_clips_is_flagged() {
        let build = build_catalog(files(&["Bento OP.mkv", "Bento ED.mkv"]));
        assert_eq!(build.catalog.total_episodes(), 0);
        assert_eq!(build.warnings.len(), 1);
        assert!(build.warnings[0].starts_with("Bento has no numbered episodes"));
    }

    #[test]
    fn catalog_iterates_series_by_name() {
        let build = build_catalog(files(&["Yuru Camp - 01.mkv", "Bento - 01.mkv", "K-On - 01.mkv"]));
        let names = build
            .catalog
            .series()
            .map(|series| series.name.as_str())
            .collect::<Vec<_>>();
        assert_eq!(names, vec!["Bento", "K-On", "Yuru Camp"]);
    }

    #[test]
    fn scan_directory_marks_directories_and_sorts() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::write(dir.path().join("b.mkv"), b"").expect("write");
        fs::write(dir.path().join("a.mkv"), b"").expect("write");
        fs::create_dir(dir.path().join("consumed")).expect("mkdir");

        let (entries, warnings) = scan_directory(dir.path()).expect("scan");
        assert!(warnings.is_empty());
        assert_eq!(
            entries,
            vec![
                DirEntryInfo::file("a.mkv"),
                DirEntryInfo::file("b.mkv"),
                DirEntryInfo {
                    name: "consumed".to_string(),
                    is_dir: true,
                },
            ]
        );
    }
}

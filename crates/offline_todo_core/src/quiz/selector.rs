//! Juz/chapter selection and uniform verse picking.

use crate::model::ayah::Ayah;
use crate::quiz::dataset::QuizDataset;
use log::debug;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::collections::BTreeSet;

/// Process-local quiz state over a loaded dataset.
pub struct QuizSelector<'d, R: Rng = StdRng> {
    dataset: &'d QuizDataset,
    rng: R,
    groups: BTreeSet<u32>,
    chapters: Vec<u32>,
    current: Option<&'d Ayah>,
}

impl<'d> QuizSelector<'d> {
    /// Selector seeded from OS entropy.
    pub fn new(dataset: &'d QuizDataset) -> Self {
        Self::with_rng(dataset, StdRng::from_entropy())
    }

    /// Reproducible selector for a fixed seed.
    pub fn seeded(dataset: &'d QuizDataset, seed: u64) -> Self {
        Self::with_rng(dataset, StdRng::seed_from_u64(seed))
    }
}

impl<'d, R: Rng> QuizSelector<'d, R> {
    pub fn with_rng(dataset: &'d QuizDataset, rng: R) -> Self {
        Self {
            dataset,
            rng,
            groups: BTreeSet::new(),
            chapters: Vec::new(),
            current: None,
        }
    }

    /// Replaces the juz selection and re-derives the chapter set.
    pub fn select_groups(&mut self, group_ids: impl IntoIterator<Item = u32>) {
        self.groups = group_ids.into_iter().collect();
        self.chapters = derive_chapters(self.dataset.ayahs(), &self.groups);
        debug!(
            "event=quiz_select module=quiz status=ok groups={} chapters={}",
            self.groups.len(),
            self.chapters.len()
        );
    }

    /// Overrides the derived chapter set with a manual choice.
    pub fn select_chapters(&mut self, chapter_ids: impl IntoIterator<Item = u32>) {
        let mut seen = BTreeSet::new();
        self.chapters = chapter_ids
            .into_iter()
            .filter(|chapter| seen.insert(*chapter))
            .collect();
    }

    /// Selected juz ids, ascending.
    pub fn groups(&self) -> impl Iterator<Item = u32> + '_ {
        self.groups.iter().copied()
    }

    /// Chapters touched by the selection, in dataset order.
    pub fn chapters(&self) -> &[u32] {
        &self.chapters
    }

    pub fn current(&self) -> Option<&'d Ayah> {
        self.current
    }

    /// Picks one verse from the selected juz.
    ///
    /// Returns `None` (and clears the current pick) when nothing matches.
    pub fn random_from_groups(&mut self) -> Option<&'d Ayah> {
        let dataset = self.dataset;
        let candidates = dataset
            .ayahs()
            .iter()
            .filter(|ayah| self.groups.contains(&ayah.juz))
            .collect::<Vec<_>>();
        self.pick("groups", &candidates)
    }

    /// Picks one verse from the chapters of the selection.
    ///
    /// Returns `None` (and clears the current pick) when nothing matches.
    pub fn random_from_derived_chapters(&mut self) -> Option<&'d Ayah> {
        let dataset = self.dataset;
        let candidates = dataset
            .ayahs()
            .iter()
            .filter(|ayah| self.chapters.contains(&ayah.surah.number))
            .collect::<Vec<_>>();
        self.pick("chapters", &candidates)
    }

    /// Clears selection, chapters and the current pick.
    pub fn reset(&mut self) {
        self.groups.clear();
        self.chapters.clear();
        self.current = None;
    }

    fn pick(&mut self, source: &'static str, candidates: &[&'d Ayah]) -> Option<&'d Ayah> {
        self.current = candidates.choose(&mut self.rng).copied();
        debug!(
            "event=quiz_pick module=quiz status=ok source={} candidates={} picked={}",
            source,
            candidates.len(),
            self.current.is_some()
        );
        self.current
    }
}

fn derive_chapters(ayahs: &[Ayah], groups: &BTreeSet<u32>) -> Vec<u32> {
    let mut seen = BTreeSet::new();
    ayahs
        .iter()
        .filter(|ayah| groups.contains(&ayah.juz))
        .map(|ayah| ayah.surah.number)
        .filter(|chapter| seen.insert(*chapter))
        .collect()
}

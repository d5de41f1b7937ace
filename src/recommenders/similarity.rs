//! Similarity strategy: find the donor whose telemetry looks most like the
//! client and offer the donor's add-ons.
//!
//! Categorical fields (locale, city, OS) score one point per exact match.
//! Each continuous field adds `1 / (1 + |ln(1+a) - ln(1+b)|)`, so identical
//! counts add a full point and distant counts approach zero.

use crate::context::{keys, Context};
use crate::error::ApiError;
use crate::models::Donor;
use crate::recommenders::Recommender;
use crate::types::{AddonId, ClientProfile, ExtraData};
use std::sync::Arc;

pub struct SimilarityRecommender {
    ctx: Context,
    donors: Option<Arc<Vec<Donor>>>,
}

fn categorical_score(client: &ClientProfile, donor: &ClientProfile) -> f64 {
    [
        (&client.locale, &donor.locale),
        (&client.geo_city, &donor.geo_city),
        (&client.os, &donor.os),
    ]
    .into_iter()
    .filter(|(a, b)| a.is_some() && a == b)
    .count() as f64
}

fn continuous_score(client: &ClientProfile, donor: &ClientProfile) -> f64 {
    let fields = |p: &ClientProfile| {
        [
            p.bookmark_count,
            p.tab_open_count,
            p.subsession_length,
            p.total_uri,
            p.unique_tlds,
        ]
    };
    fields(client)
        .into_iter()
        .zip(fields(donor))
        .map(|(a, b)| {
            let distance = ((a as f64).ln_1p() - (b as f64).ln_1p()).abs();
            1.0 / (1.0 + distance)
        })
        .sum()
}

impl SimilarityRecommender {
    pub const NAME: &'static str = "similarity";

    pub fn new(ctx: &Context) -> Self {
        let ctx = ctx.child();
        let donors = ctx.get::<Vec<Donor>>(keys::SIMILARITY_DONORS).ok();
        Self { ctx, donors }
    }

    fn best_donor<'a>(&self, donors: &'a [Donor], profile: &ClientProfile) -> Option<&'a Donor> {
        let mut best: Option<(&'a Donor, f64)> = None;
        for donor in donors {
            let score = categorical_score(profile, &donor.profile)
                + continuous_score(profile, &donor.profile);
            // first donor wins ties
            if best.map_or(true, |(_, best_score)| score > best_score) {
                best = Some((donor, score));
            }
        }
        best.map(|(donor, _)| donor)
    }
}

impl Recommender for SimilarityRecommender {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn context(&self) -> Option<&Context> {
        Some(&self.ctx)
    }

    fn can_recommend(&self, profile: &ClientProfile, _extra_data: &ExtraData) -> bool {
        let has_donors = self.donors.as_ref().is_some_and(|d| !d.is_empty());
        has_donors && profile.locale.is_some() && profile.os.is_some()
    }

    fn recommend(
        &self,
        profile: &ClientProfile,
        limit: usize,
        _extra_data: &ExtraData,
    ) -> Result<Vec<AddonId>, ApiError> {
        let Some(donors) = &self.donors else {
            return Ok(Vec::new());
        };
        let Some(donor) = self.best_donor(donors, profile) else {
            return Ok(Vec::new());
        };

        Ok(donor
            .addons
            .iter()
            .filter(|addon| !profile.has_installed(addon))
            .take(limit)
            .cloned()
            .collect())
    }
}

use std::cmp::Ordering;
use std::collections::HashSet;

use crate::{
    error::{AppError, AppResult},
    models::{
        image_url, media::MAX_KNOWN_FOR, MediaType, PersonDetail, SearchHit, TitleRef,
    },
    services::catalog::Catalog,
};

/// Search-as-you-type across movies, shows and people
pub async fn search_titles(catalog: &Catalog, query: &str) -> AppResult<Vec<SearchHit>> {
    let query = query.trim();
    if query.is_empty() {
        return Err(AppError::InvalidInput(
            "Search query cannot be empty".to_string(),
        ));
    }

    let page = catalog.search(query).await?;
    let hits: Vec<SearchHit> = page
        .results
        .into_iter()
        .filter_map(|item| item.into_hit(catalog.image_base()))
        .collect();

    tracing::info!(query = %query, results = hits.len(), "Title search completed");

    if hits.is_empty() {
        return Err(AppError::NoResults);
    }
    Ok(hits)
}

/// A cast member with their best-known titles
pub async fn person_detail(catalog: &Catalog, id: u64) -> AppResult<PersonDetail> {
    let person = catalog.person(id).await?;
    let image_base = catalog.image_base();

    let mut credits = person.combined_credits.unwrap_or_default().cast;
    credits.retain(|c| c.has_poster());
    credits.sort_by(|a, b| {
        b.popularity
            .partial_cmp(&a.popularity)
            .unwrap_or(Ordering::Equal)
    });

    let mut seen = HashSet::new();
    let known_for: Vec<TitleRef> = credits
        .into_iter()
        .filter_map(|credit| {
            let media_type = match credit.media_type.as_deref() {
                Some("movie") => MediaType::Movie,
                Some("tv") => MediaType::Show,
                _ => return None,
            };
            // Same title credited twice (several roles) shows once
            seen.insert((media_type, credit.id))
                .then(|| credit.into_title_ref(media_type, image_base))
        })
        .take(MAX_KNOWN_FOR)
        .collect();

    Ok(PersonDetail {
        id: person.id,
        name: person.name,
        biography: person.biography,
        profile: image_url(image_base, person.profile_path.as_deref()),
        known_for_department: person.known_for_department,
        known_for,
    })
}

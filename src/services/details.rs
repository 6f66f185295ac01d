use std::collections::HashSet;

use crate::{
    error::AppResult,
    models::{
        catalog::{ApiMediaDetails, ApiProvider, ApiVideo},
        image_url,
        media::{MAX_CAST, MAX_SIMILAR},
        year_of, CastMember, MediaDetail, MediaId, MediaType, Provider, Region, TitleRef, Trailer,
    },
    services::catalog::Catalog,
};

/// Fetches a title's full detail payload and normalizes it for display
pub async fn fetch_media_detail(
    catalog: &Catalog,
    media_type: MediaType,
    id: MediaId,
    region: &Region,
) -> AppResult<MediaDetail> {
    let details = catalog.details(media_type, id).await?;
    let detail = normalize_detail(details, media_type, region, catalog.image_base());

    tracing::debug!(
        id = detail.id,
        media_type = %media_type,
        cast = detail.cast.len(),
        similar = detail.similar.len(),
        subscription_providers = detail.subscription_providers.len(),
        "Normalized media detail"
    );

    Ok(detail)
}

/// Turns a detail payload into a display-ready [`MediaDetail`]
pub fn normalize_detail(
    details: ApiMediaDetails,
    media_type: MediaType,
    region: &Region,
    image_base: &str,
) -> MediaDetail {
    let region_providers = details
        .watch_providers
        .as_ref()
        .and_then(|w| w.results.get(region.as_str()))
        .cloned()
        .unwrap_or_default();

    let subscription_providers = providers(region_providers.flatrate, image_base);
    let rent_buy_providers = dedup_providers(
        region_providers
            .rent
            .into_iter()
            .chain(region_providers.buy)
            .collect(),
        image_base,
    );

    let mut cast_members = details
        .credits
        .as_ref()
        .map(|c| c.cast.clone())
        .unwrap_or_default();
    cast_members.sort_by_key(|c| c.order);
    let cast = cast_members
        .into_iter()
        .take(MAX_CAST)
        .map(|c| CastMember {
            id: c.id,
            profile: image_url(image_base, c.profile_path.as_deref()),
            character: c.character.filter(|ch| !ch.is_empty()),
            name: c.name,
        })
        .collect();

    let similar = details
        .similar
        .clone()
        .map(|page| page.results)
        .unwrap_or_default()
        .into_iter()
        .filter(|item| item.has_poster())
        .take(MAX_SIMILAR)
        .map(|item| item.into_title_ref(media_type, image_base))
        .collect::<Vec<TitleRef>>();

    let trailer = details
        .videos
        .as_ref()
        .and_then(|v| pick_trailer(&v.results));

    let runtime_minutes = match media_type {
        MediaType::Movie => details.runtime.filter(|r| *r > 0),
        MediaType::Show => details.episode_run_time.first().copied().filter(|r| *r > 0),
    };

    let certification = certification(&details, media_type, region);
    let director = director(&details, media_type);

    MediaDetail {
        id: details.id,
        media_type,
        title: details
            .title
            .clone()
            .or_else(|| details.name.clone())
            .unwrap_or_default(),
        year: year_of(
            details
                .release_date
                .as_deref()
                .filter(|d| !d.is_empty())
                .or(details.first_air_date.as_deref()),
        ),
        poster: image_url(image_base, details.poster_path.as_deref()),
        rating: (details.vote_average * 10.0).round() / 10.0,
        overview: details.overview,
        subscription_providers,
        rent_buy_providers,
        watch_link: region_providers.link,
        cast,
        similar,
        trailer,
        runtime_minutes,
        certification,
        director,
    }
}

fn providers(list: Vec<ApiProvider>, image_base: &str) -> Vec<Provider> {
    list.into_iter()
        .map(|p| p.into_provider(image_base))
        .collect()
}

/// Keeps the first occurrence of each provider id
fn dedup_providers(list: Vec<ApiProvider>, image_base: &str) -> Vec<Provider> {
    let mut seen = HashSet::new();
    list.into_iter()
        .filter(|p| seen.insert(p.provider_id))
        .map(|p| p.into_provider(image_base))
        .collect()
}

/// Official YouTube trailer, then any YouTube trailer, then a YouTube teaser
fn pick_trailer(videos: &[ApiVideo]) -> Option<Trailer> {
    let youtube: Vec<&ApiVideo> = videos.iter().filter(|v| v.site == "YouTube").collect();

    youtube
        .iter()
        .find(|v| v.video_type == "Trailer" && v.official)
        .or_else(|| youtube.iter().find(|v| v.video_type == "Trailer"))
        .or_else(|| youtube.iter().find(|v| v.video_type == "Teaser"))
        .map(|v| Trailer {
            name: v.name.clone(),
            site: v.site.clone(),
            key: v.key.clone(),
            url: format!("https://www.youtube.com/watch?v={}", v.key),
        })
}

fn certification(details: &ApiMediaDetails, media_type: MediaType, region: &Region) -> Option<String> {
    match media_type {
        MediaType::Movie => details
            .release_dates
            .as_ref()?
            .results
            .iter()
            .find(|c| c.iso_3166_1 == region.as_str())?
            .release_dates
            .iter()
            .map(|r| r.certification.trim())
            .find(|c| !c.is_empty())
            .map(str::to_string),
        MediaType::Show => details
            .content_ratings
            .as_ref()?
            .results
            .iter()
            .find(|c| c.iso_3166_1 == region.as_str())
            .map(|c| c.rating.trim().to_string())
            .filter(|r| !r.is_empty()),
    }
}

fn director(details: &ApiMediaDetails, media_type: MediaType) -> Option<String> {
    match media_type {
        MediaType::Movie => details
            .credits
            .as_ref()?
            .crew
            .iter()
            .find(|c| c.job == "Director")
            .map(|c| c.name.clone()),
        MediaType::Show => details.created_by.first().map(|c| c.name.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const IMG: &str = "https://img.test";

    fn us() -> Region {
        "US".parse().unwrap()
    }

    fn movie_payload() -> ApiMediaDetails {
        serde_json::from_value(json!({
            "id": 27205,
            "title": "Inception",
            "poster_path": "/inception.jpg",
            "release_date": "2010-07-15",
            "vote_average": 8.368,
            "overview": "Cobb steals secrets from dreams.",
            "runtime": 148,
            "credits": {
                "cast": [
                    { "id": 3, "name": "Third", "character": "C", "order": 2 },
                    { "id": 1, "name": "Leonardo DiCaprio", "character": "Cobb", "profile_path": "/leo.jpg", "order": 0 },
                    { "id": 2, "name": "Joseph Gordon-Levitt", "character": "", "order": 1 }
                ],
                "crew": [
                    { "name": "Emma Thomas", "job": "Producer" },
                    { "name": "Christopher Nolan", "job": "Director" }
                ]
            },
            "similar": { "page": 1, "results": [
                { "id": 10, "title": "With Poster", "poster_path": "/p.jpg", "release_date": "2014-11-05" },
                { "id": 11, "title": "No Poster", "poster_path": null }
            ], "total_pages": 1, "total_results": 2 },
            "videos": { "results": [
                { "key": "vimeo1", "name": "Vimeo Trailer", "site": "Vimeo", "type": "Trailer", "official": true },
                { "key": "fan", "name": "Fan Trailer", "site": "YouTube", "type": "Trailer", "official": false },
                { "key": "YoHD9XEInc0", "name": "Official Trailer", "site": "YouTube", "type": "Trailer", "official": true }
            ]},
            "watch/providers": { "results": {
                "US": {
                    "link": "https://www.themoviedb.org/movie/27205/watch?locale=US",
                    "flatrate": [ { "provider_id": 8, "provider_name": "Netflix", "logo_path": "/n.jpg" } ],
                    "rent": [ { "provider_id": 2, "provider_name": "Apple TV", "logo_path": "/a.jpg" } ],
                    "buy": [
                        { "provider_id": 2, "provider_name": "Apple TV", "logo_path": "/a.jpg" },
                        { "provider_id": 3, "provider_name": "Google Play", "logo_path": "/g.jpg" }
                    ]
                },
                "DE": { "flatrate": [ { "provider_id": 99, "provider_name": "Other" } ] }
            }},
            "release_dates": { "results": [
                { "iso_3166_1": "DE", "release_dates": [ { "certification": "12" } ] },
                { "iso_3166_1": "US", "release_dates": [ { "certification": "" }, { "certification": "PG-13" } ] }
            ]}
        }))
        .unwrap()
    }

    #[test]
    fn test_normalizes_movie_detail() {
        let detail = normalize_detail(movie_payload(), MediaType::Movie, &us(), IMG);

        assert_eq!(detail.title, "Inception");
        assert_eq!(detail.year.as_deref(), Some("2010"));
        assert_eq!(detail.poster.as_deref(), Some("https://img.test/inception.jpg"));
        assert_eq!(detail.rating, 8.4);
        assert_eq!(detail.runtime_minutes, Some(148));
        assert_eq!(detail.certification.as_deref(), Some("PG-13"));
        assert_eq!(detail.director.as_deref(), Some("Christopher Nolan"));
        assert_eq!(
            detail.watch_link.as_deref(),
            Some("https://www.themoviedb.org/movie/27205/watch?locale=US")
        );
    }

    #[test]
    fn test_providers_for_region_only() {
        let detail = normalize_detail(movie_payload(), MediaType::Movie, &us(), IMG);

        let subscription: Vec<_> = detail.subscription_providers.iter().map(|p| p.id).collect();
        assert_eq!(subscription, vec![8]);

        let rent_buy: Vec<_> = detail.rent_buy_providers.iter().map(|p| p.id).collect();
        assert_eq!(rent_buy, vec![2, 3]);
    }

    #[test]
    fn test_cast_in_billing_order() {
        let detail = normalize_detail(movie_payload(), MediaType::Movie, &us(), IMG);

        let names: Vec<_> = detail.cast.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Leonardo DiCaprio", "Joseph Gordon-Levitt", "Third"]);
        assert_eq!(detail.cast[0].profile.as_deref(), Some("https://img.test/leo.jpg"));
        assert_eq!(detail.cast[1].character, None);
    }

    #[test]
    fn test_similar_drops_posterless_titles() {
        let detail = normalize_detail(movie_payload(), MediaType::Movie, &us(), IMG);
        assert_eq!(detail.similar.len(), 1);
        assert_eq!(detail.similar[0].id, 10);
        assert_eq!(detail.similar[0].year.as_deref(), Some("2014"));
    }

    #[test]
    fn test_prefers_official_youtube_trailer() {
        let detail = normalize_detail(movie_payload(), MediaType::Movie, &us(), IMG);
        let trailer = detail.trailer.unwrap();
        assert_eq!(trailer.key, "YoHD9XEInc0");
        assert_eq!(trailer.url, "https://www.youtube.com/watch?v=YoHD9XEInc0");
    }

    #[test]
    fn test_bounds_cast_and_similar() {
        let cast: Vec<_> = (0..25)
            .map(|i| json!({ "id": i, "name": format!("Actor {}", i), "order": i }))
            .collect();
        let similar: Vec<_> = (0..30)
            .map(|i| json!({ "id": 100 + i, "title": format!("T{}", i), "poster_path": "/x.jpg" }))
            .collect();
        let details: ApiMediaDetails = serde_json::from_value(json!({
            "id": 1,
            "title": "Big",
            "credits": { "cast": cast, "crew": [] },
            "similar": { "results": similar }
        }))
        .unwrap();

        let detail = normalize_detail(details, MediaType::Movie, &us(), IMG);
        assert_eq!(detail.cast.len(), MAX_CAST);
        assert_eq!(detail.similar.len(), MAX_SIMILAR);
    }

    #[test]
    fn test_normalizes_sparse_show_detail() {
        let details: ApiMediaDetails = serde_json::from_value(json!({
            "id": 1396,
            "name": "Breaking Bad",
            "first_air_date": "2008-01-20",
            "vote_average": 8.9,
            "episode_run_time": [45, 47],
            "created_by": [ { "name": "Vince Gilligan" } ],
            "content_ratings": { "results": [ { "iso_3166_1": "US", "rating": "TV-MA" } ] },
            "videos": { "results": [
                { "key": "tease", "name": "Teaser", "site": "YouTube", "type": "Teaser" }
            ]}
        }))
        .unwrap();

        let detail = normalize_detail(details, MediaType::Show, &us(), IMG);
        assert_eq!(detail.title, "Breaking Bad");
        assert_eq!(detail.year.as_deref(), Some("2008"));
        assert_eq!(detail.poster, None);
        assert_eq!(detail.runtime_minutes, Some(45));
        assert_eq!(detail.certification.as_deref(), Some("TV-MA"));
        assert_eq!(detail.director.as_deref(), Some("Vince Gilligan"));
        assert_eq!(detail.trailer.map(|t| t.key).as_deref(), Some("tease"));
        assert!(detail.subscription_providers.is_empty());
        assert!(detail.cast.is_empty());
    }
}

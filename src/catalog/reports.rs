use crate::domain::{Review, Store, StoreSummary, TagCount};
use std::collections::HashMap;
use uuid::Uuid;

/// Stateless read-side reports. Pure functions over already-fetched
/// records; the catalog supplies the data and these never write.
pub struct Reports;

impl Reports {
    /// Tag popularity: every tag occurrence counts, including duplicates
    /// within a single store. Sorted by count descending, then tag
    /// ascending.
    pub fn count_tags(stores: &[Store]) -> Vec<TagCount> {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for store in stores {
            for tag in &store.tags {
                *counts.entry(tag.as_str()).or_insert(0) += 1;
            }
        }

        let mut report: Vec<TagCount> = counts
            .into_iter()
            .map(|(tag, count)| TagCount {
                tag: tag.to_string(),
                count,
            })
            .collect();
        report.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.tag.cmp(&b.tag)));
        report
    }

    /// Top-rated stores: join reviews by store id, keep stores with more
    /// than one review, rank by average rating descending. Ties break on
    /// name then slug so the ordering is total.
    pub fn rank_stores(
        stores: Vec<Store>,
        reviews: Vec<Review>,
        limit: usize,
    ) -> Vec<StoreSummary> {
        let mut by_store: HashMap<Uuid, Vec<Review>> = HashMap::new();
        for review in reviews {
            by_store.entry(review.store_id).or_default().push(review);
        }

        let mut ranked: Vec<StoreSummary> = Vec::new();
        for store in stores {
            let Some(id) = store.id else { continue };
            let joined = by_store.remove(&id).unwrap_or_default();
            // Minimum sample size: a single review is not a ranking
            if joined.len() <= 1 {
                continue;
            }
            let average_rating =
                joined.iter().map(|r| f64::from(r.rating)).sum::<f64>() / joined.len() as f64;
            ranked.push(StoreSummary {
                photo: store.photo,
                name: store.name,
                slug: store.slug,
                reviews: joined,
                average_rating,
            });
        }

        ranked.sort_by(|a, b| {
            b.average_rating
                .total_cmp(&a.average_rating)
                .then_with(|| a.name.cmp(&b.name))
                .then_with(|| a.slug.cmp(&b.slug))
        });
        ranked.truncate(limit);
        ranked
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Location;
    use chrono::Utc;

    fn store(name: &str, tags: &[&str]) -> Store {
        Store {
            id: Some(Uuid::new_v4()),
            name: name.to_string(),
            slug: name.to_lowercase().replace(' ', "-"),
            description: None,
            tags: tags.iter().map(|t| t.to_string()).collect(),
            location: Location {
                address: "addr".to_string(),
                coordinates: [0.0, 0.0],
            },
            photo: None,
            author_id: Uuid::new_v4(),
            created_at: Utc::now(),
        }
    }

    fn review(store_id: Uuid, rating: u8) -> Review {
        Review {
            id: Some(Uuid::new_v4()),
            store_id,
            author_id: Uuid::new_v4(),
            text: String::new(),
            rating,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn tag_counts_sort_by_count_then_tag() {
        let stores = vec![
            store("One", &["a", "b"]),
            store("Two", &["a"]),
            store("Three", &["b", "b"]),
        ];
        let report = Reports::count_tags(&stores);
        assert_eq!(
            report,
            vec![
                TagCount { tag: "b".to_string(), count: 3 },
                TagCount { tag: "a".to_string(), count: 2 },
            ]
        );
    }

    #[test]
    fn tag_ties_break_lexicographically() {
        let stores = vec![store("One", &["zebra", "apple"])];
        let report = Reports::count_tags(&stores);
        assert_eq!(report[0].tag, "apple");
        assert_eq!(report[1].tag, "zebra");
    }

    #[test]
    fn single_review_stores_are_excluded() {
        let popular = store("Popular", &[]);
        let lonely = store("Lonely", &[]);
        let popular_id = popular.id.unwrap();
        let lonely_id = lonely.id.unwrap();

        let reviews = vec![
            review(popular_id, 4),
            review(popular_id, 5),
            review(lonely_id, 5),
        ];
        let ranked = Reports::rank_stores(vec![popular, lonely], reviews, 10);

        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].name, "Popular");
        assert!((ranked[0].average_rating - 4.5).abs() < f64::EPSILON);
        assert_eq!(ranked[0].reviews.len(), 2);
    }

    #[test]
    fn ranking_is_by_average_descending() {
        let good = store("Good", &[]);
        let better = store("Better", &[]);
        let good_id = good.id.unwrap();
        let better_id = better.id.unwrap();

        let reviews = vec![
            review(good_id, 3),
            review(good_id, 3),
            review(better_id, 4),
            review(better_id, 5),
        ];
        let ranked = Reports::rank_stores(vec![good, better], reviews, 10);

        assert_eq!(ranked[0].name, "Better");
        assert_eq!(ranked[1].name, "Good");
    }

    #[test]
    fn equal_averages_rank_by_name() {
        let beta = store("Beta", &[]);
        let alpha = store("Alpha", &[]);
        let beta_id = beta.id.unwrap();
        let alpha_id = alpha.id.unwrap();

        let reviews = vec![
            review(beta_id, 4),
            review(beta_id, 4),
            review(alpha_id, 4),
            review(alpha_id, 4),
        ];
        let ranked = Reports::rank_stores(vec![beta, alpha], reviews, 10);
        assert_eq!(ranked[0].name, "Alpha");
        assert_eq!(ranked[1].name, "Beta");
    }

    #[test]
    fn limit_truncates_the_ranking() {
        let mut stores = Vec::new();
        let mut reviews = Vec::new();
        for i in 0..5 {
            let s = store(&format!("Store {}", i), &[]);
            let id = s.id.unwrap();
            reviews.push(review(id, 3));
            reviews.push(review(id, 5));
            stores.push(s);
        }
        let ranked = Reports::rank_stores(stores, reviews, 2);
        assert_eq!(ranked.len(), 2);
    }
}

use chrono::{DateTime, Duration, Utc};

/// Seeded items are dated at most this many days before initialization.
const MAX_AGE_DAYS: u64 = 25;
const MINUTES_PER_DAY: u64 = 24 * 60;

pub(crate) struct SeedCategory {
    pub name: &'static str,
    pub slug: &'static str,
}

pub(crate) struct SeedNews {
    pub category_slug: &'static str,
    pub title: &'static str,
    pub summary: &'static str,
    pub content: &'static str,
    pub accent_color: &'static str,
    pub is_featured: bool,
}

pub(crate) const SEED_CATEGORIES: &[SeedCategory] = &[
    SeedCategory {
        name: "Politics",
        slug: "politics",
    },
    SeedCategory {
        name: "Technology",
        slug: "tech",
    },
    SeedCategory {
        name: "Sport",
        slug: "sport",
    },
    SeedCategory {
        name: "Culture",
        slug: "culture",
    },
];

pub(crate) const SEED_NEWS: &[SeedNews] = &[
    // Landing page cards
    SeedNews {
        category_slug: "politics",
        title: "Leaders meet at international summit",
        summary: "Key questions were discussed at the international summit. Details of the agenda and first results.",
        content: "Leaders discussed economic cooperation, security and humanitarian initiatives. The parties agreed to continue consultations and prepare a joint statement.",
        accent_color: "#E53935",
        is_featured: true,
    },
    SeedNews {
        category_slug: "politics",
        title: "New legislative initiatives",
        summary: "Parliament received proposals to improve digital public services and support the regions.",
        content: "The initiatives simplify procedures for citizens and businesses and make public services more transparent. Committees are expected to review them next.",
        accent_color: "#1E40AF",
        is_featured: true,
    },
    SeedNews {
        category_slug: "tech",
        title: "Artificial intelligence in customer services",
        summary: "Companies speed up the rollout of AI tools for customer support and analytics.",
        content: "Automating routine requests lowers the load on operators and improves response times. Answer quality and data correctness still need close monitoring.",
        accent_color: "#06B6D4",
        is_featured: true,
    },
    SeedNews {
        category_slug: "tech",
        title: "Green energy",
        summary: "New developments raise the efficiency of solar panels and storage systems.",
        content: "Researchers report higher efficiency at a lower cost. Pilot projects are expected in regions with high solar exposure over the next few years.",
        accent_color: "#10B981",
        is_featured: true,
    },
    SeedNews {
        category_slug: "sport",
        title: "Football championship",
        summary: "Teams finish preparing for the season start. Coaches are betting on young players.",
        content: "Pre-season matches show tactical experiments and squad rotation. Fans are expected to show strong interest in the opening rounds.",
        accent_color: "#16A34A",
        is_featured: true,
    },
    SeedNews {
        category_slug: "culture",
        title: "Cultural event of the year",
        summary: "A contemporary art exhibition opened with artists from many countries.",
        content: "The exhibition brings together installations, painting and digital works. The organizers prepared an education program and meetings with the artists.",
        accent_color: "#7C3AED",
        is_featured: true,
    },
    // Smaller cards
    SeedNews {
        category_slug: "tech",
        title: "Quantum computers",
        summary: "Scientists presented a new prototype of stable qubits.",
        content: "The prototype shows improved stability. Practical use cases are closer, but scaling remains ahead.",
        accent_color: "#334155",
        is_featured: false,
    },
    SeedNews {
        category_slug: "tech",
        title: "Biotechnology",
        summary: "Startups offer rapid tests and personalized medicine.",
        content: "New technology speeds up diagnostics. Quality standards and patient data protection matter more than ever.",
        accent_color: "#64748B",
        is_featured: false,
    },
    SeedNews {
        category_slug: "politics",
        title: "Regional elections",
        summary: "The campaign period has started and observers are preparing to monitor it.",
        content: "Commissions are checking voter lists and logistics. Candidates have stepped up meetings with voters.",
        accent_color: "#475569",
        is_featured: false,
    },
    SeedNews {
        category_slug: "politics",
        title: "Budget amendments",
        summary: "Amendments to the budget and social programs were reviewed.",
        content: "Spending priorities and support for infrastructure projects are under discussion. Decisions will be refined before the second reading.",
        accent_color: "#0F766E",
        is_featured: false,
    },
    SeedNews {
        category_slug: "culture",
        title: "Theatre premiere",
        summary: "A new play premiered at the national theatre.",
        content: "Critics praised the staging for its set design and acting. Additional performances are planned.",
        accent_color: "#4338CA",
        is_featured: false,
    },
    SeedNews {
        category_slug: "sport",
        title: "Olympic preparation",
        summary: "National teams step up training and go through medical checks.",
        content: "The focus is on recovery and individual training plans. Specialists note improved results in several disciplines.",
        accent_color: "#F97316",
        is_featured: false,
    },
];

/// Publication time for a seeded item: `now` minus an offset that depends
/// only on the title.
pub(crate) fn seed_published_at(title: &str, now: DateTime<Utc>) -> DateTime<Utc> {
    now - seed_age(title)
}

fn seed_age(title: &str) -> Duration {
    let hash = fnv1a(title.as_bytes());
    let days = hash % MAX_AGE_DAYS;
    let minutes = (hash / MAX_AGE_DAYS) % MINUTES_PER_DAY;
    // Both terms are small enough that the casts cannot truncate.
    Duration::days(days as i64) + Duration::minutes(minutes as i64)
}

// 64-bit FNV-1a; stable across platforms and compiler versions
fn fnv1a(bytes: &[u8]) -> u64 {
    const OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0000_0100_0000_01b3;

    bytes.iter().fold(OFFSET_BASIS, |hash, byte| {
        (hash ^ u64::from(*byte)).wrapping_mul(PRIME)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewNewsItem;
    use chrono::TimeZone;
    use std::collections::HashSet;

    #[test]
    fn fnv1a_matches_reference_vectors() {
        assert_eq!(fnv1a(b""), 0xcbf2_9ce4_8422_2325);
        assert_eq!(fnv1a(b"a"), 0xaf63_dc4c_8601_ec8c);
    }

    #[test]
    fn seed_dates_are_deterministic_and_bounded() {
        let now = Utc.with_ymd_and_hms(2025, 6, 15, 12, 0, 0).unwrap();
        for item in SEED_NEWS {
            let first = seed_published_at(item.title, now);
            let second = seed_published_at(item.title, now);
            assert_eq!(first, second);
            assert!(first <= now);
            assert!(now - first < Duration::days(MAX_AGE_DAYS as i64));
        }
    }

    #[test]
    fn seed_set_shape() {
        assert_eq!(SEED_CATEGORIES.len(), 4);
        assert_eq!(SEED_NEWS.len(), 12);
        assert_eq!(SEED_NEWS.iter().filter(|n| n.is_featured).count(), 6);
        assert_eq!(
            SEED_NEWS.iter().filter(|n| n.category_slug == "tech").count(),
            4
        );

        let slugs: HashSet<_> = SEED_CATEGORIES.iter().map(|c| c.slug).collect();
        assert_eq!(slugs.len(), SEED_CATEGORIES.len());
        assert!(SEED_NEWS.iter().all(|n| slugs.contains(n.category_slug)));

        let titles: HashSet<_> = SEED_NEWS.iter().map(|n| n.title).collect();
        assert_eq!(titles.len(), SEED_NEWS.len());
    }

    #[test]
    fn seed_news_passes_validation() {
        for item in SEED_NEWS {
            let draft = NewNewsItem {
                category_id: 1,
                title: item.title.to_string(),
                summary: item.summary.to_string(),
                content: item.content.to_string(),
                accent_color: Some(item.accent_color.to_string()),
                published_at: None,
                is_featured: item.is_featured,
            };
            assert!(draft.validate().is_ok(), "seed item {:?} is invalid", item.title);
        }
    }
}

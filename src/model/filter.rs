// Copyright (C) 2026  Caprica Software Limited
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! Lecture filtering and category projection.
//!
//! Pure functions that derive the filtered view from the catalog and the
//! active criteria, plus the per-tab projection layered on top of it. Both
//! preserve catalog order and never mutate their inputs.
//!
//! The filtered view is canonical: playback sequencing always walks it, even
//! while the screen shows a tab projection or a shuffled presentation.

use std::collections::HashSet;

use crate::model::{FilterCriteria, Lecture, Tab};

/// Derives the filtered view: every lecture satisfying all active criteria,
/// in catalog order.
pub(crate) fn apply(lectures: &[Lecture], criteria: &FilterCriteria) -> Vec<Lecture> {
    lectures
        .iter()
        .filter(|lecture| matches(lecture, criteria))
        .cloned()
        .collect()
}

/// Whether a single lecture satisfies all active criteria.
fn matches(lecture: &Lecture, criteria: &FilterCriteria) -> bool {
    if !criteria.search.is_empty() {
        // Title and location match case-insensitively; the raw date string
        // matches verbatim, so "1972-03" narrows to a month.
        let term = criteria.search.to_lowercase();
        let matched = lecture.title.to_lowercase().contains(&term)
            || lecture.location.to_lowercase().contains(&term)
            || lecture.date.contains(&criteria.search);
        if !matched {
            return false;
        }
    }

    if !criteria.year.is_empty() && lecture.year() != Some(criteria.year.as_str()) {
        return false;
    }

    if !criteria.location.is_empty() && lecture.location != criteria.location {
        return false;
    }

    true
}

/// Projects the filtered view onto a category tab.
///
/// The projection is presentation only; it never feeds back into the
/// filtered view used for sequencing.
pub(crate) fn project(view: &[Lecture], tab: Tab, favourites: &HashSet<String>) -> Vec<Lecture> {
    view.iter()
        .filter(|lecture| match tab {
            Tab::All => true,
            Tab::Favourites => favourites.contains(&lecture.link),
            _ => in_category(tab, &lecture.title),
        })
        .cloned()
        .collect()
}

/// Title predicate for the scripture categories.
///
/// `Other` holds every lecture the three named categories do not claim.
fn in_category(tab: Tab, title: &str) -> bool {
    let title = title.to_lowercase();
    match tab {
        Tab::BhagavadGita => title.contains("bhagavad-gita"),
        Tab::SrimadBhagavatam => {
            title.contains("srimad-bhagavatam") || title.contains("bhagavatam")
        }
        Tab::CaitanyaCaritamrta => {
            title.contains("caitanya-caritamrta") || title.contains("caitanya")
        }
        Tab::Other => {
            !title.contains("bhagavad-gita")
                && !title.contains("bhagavatam")
                && !title.contains("caitanya-caritamrta")
                && !title.contains("caitanya")
        }
        Tab::All | Tab::Favourites => true,
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn lecture(title: &str, date: &str, location: &str) -> Lecture {
        Lecture {
            title: title.to_string(),
            date: date.to_string(),
            location: location.to_string(),
            link: format!("https://archive.example/{}.mp3", title.replace(' ', "-")),
        }
    }

    fn sample_catalog() -> Vec<Lecture> {
        vec![
            lecture("Bhagavad-gita 2.13", "1972-03-15", "London"),
            lecture("Srimad-Bhagavatam 1.2.6", "1972-09-01", "Los Angeles"),
            lecture("Caitanya-caritamrta Adi 7.1", "1967-02-20", "San Francisco"),
            lecture("Bhagavatam class", "1974-06-10", "Vrndavana"),
            lecture("Morning walk", "1974-06-11", ""),
            lecture("Initiation lecture", "1968-09-05", "New York"),
        ]
    }

    fn empty() -> FilterCriteria {
        FilterCriteria::default()
    }

    #[test]
    fn empty_criteria_return_the_whole_catalog() {
        let catalog = sample_catalog();
        assert_eq!(apply(&catalog, &empty()), catalog);
    }

    #[test]
    fn search_matches_title_case_insensitively() {
        let catalog = sample_catalog();
        let criteria = FilterCriteria {
            search: "BHAGAVAD".to_string(),
            ..empty()
        };
        let result = apply(&catalog, &criteria);
        let titles: Vec<&str> = result.iter().map(|l| l.title.as_str()).collect();
        assert_eq!(titles, vec!["Bhagavad-gita 2.13"]);
    }

    #[test]
    fn search_matches_location_case_insensitively() {
        let catalog = sample_catalog();
        let criteria = FilterCriteria {
            search: "london".to_string(),
            ..empty()
        };
        let result = apply(&catalog, &criteria);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].location, "London");
    }

    #[test]
    fn search_matches_the_raw_date_string() {
        let catalog = sample_catalog();
        let criteria = FilterCriteria {
            search: "1974-06".to_string(),
            ..empty()
        };
        let result = apply(&catalog, &criteria);
        assert_eq!(result.len(), 2);
    }

    #[test]
    fn year_criterion_matches_exactly() {
        let catalog = sample_catalog();
        let criteria = FilterCriteria {
            year: "1972".to_string(),
            ..empty()
        };
        let result = apply(&catalog, &criteria);
        assert_eq!(result.len(), 2);
        assert!(result.iter().all(|l| l.year() == Some("1972")));
    }

    #[test]
    fn location_criterion_is_exact_not_substring() {
        let mut catalog = sample_catalog();
        catalog.push(lecture("Evening darsana", "1973-01-01", "London suburb"));
        let criteria = FilterCriteria {
            location: "London".to_string(),
            ..empty()
        };
        let result = apply(&catalog, &criteria);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].location, "London");
    }

    #[test]
    fn criteria_combine_with_and() {
        let catalog = sample_catalog();
        let criteria = FilterCriteria {
            search: "class".to_string(),
            year: "1974".to_string(),
            location: "Vrndavana".to_string(),
        };
        let result = apply(&catalog, &criteria);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].title, "Bhagavatam class");

        let conflicting = FilterCriteria {
            search: "class".to_string(),
            year: "1972".to_string(),
            location: String::new(),
        };
        assert!(apply(&catalog, &conflicting).is_empty());
    }

    #[test]
    fn impossible_criteria_yield_an_empty_view() {
        let catalog = sample_catalog();
        let criteria = FilterCriteria {
            search: "no such lecture anywhere".to_string(),
            ..empty()
        };
        assert!(apply(&catalog, &criteria).is_empty());
    }

    #[test]
    fn all_tab_projects_everything() {
        let catalog = sample_catalog();
        assert_eq!(project(&catalog, Tab::All, &HashSet::new()), catalog);
    }

    #[test]
    fn bhagavatam_tab_accepts_the_short_title_form() {
        let catalog = sample_catalog();
        let result = project(&catalog, Tab::SrimadBhagavatam, &HashSet::new());
        let titles: Vec<&str> = result.iter().map(|l| l.title.as_str()).collect();
        assert_eq!(titles, vec!["Srimad-Bhagavatam 1.2.6", "Bhagavatam class"]);
    }

    #[test]
    fn other_tab_holds_unclaimed_lectures() {
        let catalog = sample_catalog();
        let result = project(&catalog, Tab::Other, &HashSet::new());
        let titles: Vec<&str> = result.iter().map(|l| l.title.as_str()).collect();
        assert_eq!(titles, vec!["Morning walk", "Initiation lecture"]);
    }

    #[test]
    fn favourites_tab_intersects_with_the_filtered_view() {
        let catalog = sample_catalog();
        let favourites: HashSet<String> = [catalog[0].link.clone(), catalog[5].link.clone()]
            .into_iter()
            .collect();

        let criteria = FilterCriteria {
            year: "1972".to_string(),
            ..empty()
        };
        let view = apply(&catalog, &criteria);
        let result = project(&view, Tab::Favourites, &favourites);

        // Only the favourite that also survives the year filter remains.
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].link, catalog[0].link);
    }

    #[test]
    fn categories_and_other_partition_the_view() {
        let catalog = sample_catalog();
        let named: usize = [Tab::BhagavadGita, Tab::SrimadBhagavatam, Tab::CaitanyaCaritamrta]
            .iter()
            .map(|tab| project(&catalog, *tab, &HashSet::new()).len())
            .sum();
        let other = project(&catalog, Tab::Other, &HashSet::new()).len();
        assert_eq!(named + other, catalog.len());
    }

    prop_compose! {
        fn arb_lecture()(
            title in "[a-z]{0,12}",
            year in 1966u32..1978,
            month in 1u32..13,
            location in prop::sample::select(vec!["London", "Bombay", "Mayapur", ""]),
            id in 0u32..10_000,
        ) -> Lecture {
            Lecture {
                title,
                date: format!("{}-{:02}-01", year, month),
                location: location.to_string(),
                link: format!("https://archive.example/{}.mp3", id),
            }
        }
    }

    proptest! {
        #[test]
        fn filtering_yields_an_order_preserving_matching_subsequence(
            catalog in prop::collection::vec(arb_lecture(), 0..40),
            search in "[a-z]{0,3}",
        ) {
            let criteria = FilterCriteria { search, ..FilterCriteria::default() };
            let view = apply(&catalog, &criteria);

            let mut last = 0;
            for lecture in &view {
                prop_assert!(matches(lecture, &criteria));
                let position = catalog[last..]
                    .iter()
                    .position(|l| l == lecture)
                    .expect("filtered lecture missing from catalog");
                last += position + 1;
            }
        }

        #[test]
        fn refiltering_an_already_filtered_view_changes_nothing(
            catalog in prop::collection::vec(arb_lecture(), 0..40),
            search in "[a-z]{0,3}",
            year in 1966u32..1978,
        ) {
            let criteria = FilterCriteria {
                search,
                year: year.to_string(),
                ..FilterCriteria::default()
            };

            let once = apply(&catalog, &criteria);
            let twice = apply(&once, &criteria);
            prop_assert_eq!(once, twice);
        }

        #[test]
        fn adding_criteria_never_grows_the_view(
            catalog in prop::collection::vec(arb_lecture(), 0..40),
            search in "[a-z]{0,3}",
            year in 1966u32..1978,
        ) {
            let loose = FilterCriteria { search: search.clone(), ..FilterCriteria::default() };
            let tight = FilterCriteria {
                search,
                year: year.to_string(),
                ..FilterCriteria::default()
            };

            let loose_view = apply(&catalog, &loose);
            let tight_view = apply(&catalog, &tight);

            prop_assert!(tight_view.len() <= loose_view.len());
            prop_assert!(tight_view.iter().all(|l| loose_view.contains(l)));
        }

        #[test]
        fn projection_never_invents_lectures(
            catalog in prop::collection::vec(arb_lecture(), 0..40),
        ) {
            for tab in Tab::ORDER {
                let projected = project(&catalog, tab, &HashSet::new());
                prop_assert!(projected.iter().all(|l| catalog.contains(l)));
            }
        }
    }
}

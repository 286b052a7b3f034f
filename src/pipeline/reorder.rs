//! Page reordering: put front matter first and back covers last.
//!
//! PDG page files carry their role in their file name: `cov001.pdg` is a
//! cover, `bok001.pdg` the title page, `leg001.pdg` the copyright page,
//! `fow001.pdg` the foreword, and everything else (table of contents and
//! body, usually `000001.pdg` …) is content. A plain name sort puts the body
//! before the covers, so the pages are regrouped into book order:
//!
//! ```text
//! front cover │ title │ copyright │ foreword │ body … │ back cover(s)
//! ```
//!
//! Each extraction is a pure partition that hands its remainder to the next
//! one. Tags are plain substrings and are not guaranteed to be disjoint, so
//! the extraction order (cov, bok, leg, fow) decides the role of a name that
//! contains several tags.

use serde::Serialize;

/// Structural role encoded as a substring of a page file name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum RoleTag {
    /// `cov`: the first match is the front cover, the rest are back covers.
    Cover,
    /// `bok`: title page.
    Title,
    /// `leg`: copyright page.
    Copyright,
    /// `fow`: foreword.
    Foreword,
}

impl RoleTag {
    /// Tags in extraction order. Earlier tags win when a name matches several.
    pub const ALL: [RoleTag; 4] = [
        RoleTag::Cover,
        RoleTag::Title,
        RoleTag::Copyright,
        RoleTag::Foreword,
    ];

    /// The substring that marks this role in a file name.
    pub fn tag(self) -> &'static str {
        match self {
            RoleTag::Cover => "cov",
            RoleTag::Title => "bok",
            RoleTag::Copyright => "leg",
            RoleTag::Foreword => "fow",
        }
    }

    /// Role of a single file name, or `None` for body pages.
    pub fn classify(name: &str) -> Option<RoleTag> {
        Self::ALL.into_iter().find(|role| name.contains(role.tag()))
    }
}

/// Split `pages` into those whose name contains `tag` and the rest.
///
/// Both halves keep their original relative order. Case-sensitive; the tag
/// may occur anywhere in the name.
pub fn extract_special_pages<T: AsRef<str>>(pages: Vec<T>, tag: &str) -> (Vec<T>, Vec<T>) {
    pages
        .into_iter()
        .partition(|page| page.as_ref().contains(tag))
}

/// Pages grouped by role, in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageLayout<T> {
    pub front_cover: Option<T>,
    pub title: Vec<T>,
    pub copyright: Vec<T>,
    pub foreword: Vec<T>,
    pub body: Vec<T>,
    pub back_cover: Vec<T>,
}

/// Group sizes of a [`PageLayout`], for reporting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PageLayoutSummary {
    pub front_cover: usize,
    pub title: usize,
    pub copyright: usize,
    pub foreword: usize,
    pub body: usize,
    pub back_cover: usize,
}

impl<T> PageLayout<T> {
    /// Total number of pages across all groups.
    pub fn len(&self) -> usize {
        usize::from(self.front_cover.is_some())
            + self.title.len()
            + self.copyright.len()
            + self.foreword.len()
            + self.body.len()
            + self.back_cover.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn summary(&self) -> PageLayoutSummary {
        PageLayoutSummary {
            front_cover: usize::from(self.front_cover.is_some()),
            title: self.title.len(),
            copyright: self.copyright.len(),
            foreword: self.foreword.len(),
            body: self.body.len(),
            back_cover: self.back_cover.len(),
        }
    }

    /// Flatten into the final page sequence.
    pub fn into_sequence(self) -> Vec<T> {
        let mut out = Vec::with_capacity(self.len());
        out.extend(self.front_cover);
        out.extend(self.title);
        out.extend(self.copyright);
        out.extend(self.foreword);
        out.extend(self.body);
        out.extend(self.back_cover);
        out
    }
}

/// Group `pages` by role without flattening.
pub fn layout_pages<T: AsRef<str>>(pages: Vec<T>) -> PageLayout<T> {
    let (covers, remain) = extract_special_pages(pages, RoleTag::Cover.tag());
    let (title, remain) = extract_special_pages(remain, RoleTag::Title.tag());
    let (copyright, remain) = extract_special_pages(remain, RoleTag::Copyright.tag());
    let (foreword, body) = extract_special_pages(remain, RoleTag::Foreword.tag());

    let mut covers = covers.into_iter();
    let front_cover = covers.next();
    let back_cover = covers.collect();

    PageLayout {
        front_cover,
        title,
        copyright,
        foreword,
        body,
        back_cover,
    }
}

/// Reorder `pages` into book order.
///
/// The result is a permutation of the input: nothing is dropped or
/// duplicated, and pages within a role keep their input order.
pub fn reorder_pages<T: AsRef<str>>(pages: Vec<T>) -> Vec<T> {
    layout_pages(pages).into_sequence()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn extract_keeps_relative_order() {
        let (hit, rest) = extract_special_pages(
            names(&["p1.jpg", "cov2.jpg", "p2.jpg", "cov1.jpg"]),
            "cov",
        );
        assert_eq!(hit, names(&["cov2.jpg", "cov1.jpg"]));
        assert_eq!(rest, names(&["p1.jpg", "p2.jpg"]));
    }

    #[test]
    fn extract_without_match_returns_input() {
        let input = names(&["p1.jpg", "p2.jpg"]);
        let (hit, rest) = extract_special_pages(input.clone(), "fow");
        assert!(hit.is_empty());
        assert_eq!(rest, input);
    }

    #[test]
    fn extract_twice_is_empty_second_time() {
        let (first, rest) = extract_special_pages(names(&["leg.jpg", "a.jpg", "leg2.jpg"]), "leg");
        assert_eq!(first.len(), 2);
        let (second, rest2) = extract_special_pages(rest.clone(), "leg");
        assert!(second.is_empty());
        assert_eq!(rest2, rest);
    }

    #[test]
    fn extract_is_case_sensitive() {
        let (hit, rest) = extract_special_pages(names(&["COV.jpg", "cov.jpg"]), "cov");
        assert_eq!(hit, names(&["cov.jpg"]));
        assert_eq!(rest, names(&["COV.jpg"]));
    }

    #[test]
    fn two_covers_frame_the_body() {
        let input = names(&["cov_1.jpg", "bok.jpg", "p01.jpg", "p02.jpg", "cov_2.jpg"]);
        assert_eq!(
            reorder_pages(input),
            names(&["cov_1.jpg", "bok.jpg", "p01.jpg", "p02.jpg", "cov_2.jpg"])
        );
    }

    #[test]
    fn front_matter_moves_ahead_of_body() {
        let input = names(&["p02.jpg", "leg.jpg", "p01.jpg", "cov.jpg", "fow.jpg"]);
        assert_eq!(
            reorder_pages(input),
            names(&["cov.jpg", "leg.jpg", "fow.jpg", "p02.jpg", "p01.jpg"])
        );
    }

    #[test]
    fn second_cover_becomes_back_cover() {
        let input = names(&["cov_a.jpg", "cov_b.jpg"]);
        let layout = layout_pages(input);
        assert_eq!(layout.front_cover.as_deref(), Some("cov_a.jpg"));
        assert_eq!(layout.back_cover, names(&["cov_b.jpg"]));
        assert_eq!(layout.into_sequence(), names(&["cov_a.jpg", "cov_b.jpg"]));
    }

    #[test]
    fn extra_covers_keep_their_order_at_the_tail() {
        let input = names(&["cov3.jpg", "p1.jpg", "cov1.jpg", "cov2.jpg", "p2.jpg"]);
        assert_eq!(
            reorder_pages(input),
            names(&["cov3.jpg", "p1.jpg", "p2.jpg", "cov1.jpg", "cov2.jpg"])
        );
    }

    #[test]
    fn untagged_input_is_unchanged() {
        let input = names(&["000003.jpg", "000001.jpg", "!00001.jpg", "000002.jpg"]);
        assert_eq!(reorder_pages(input.clone()), input);
    }

    #[test]
    fn no_cover_means_no_cover_slot() {
        let layout = layout_pages(names(&["bok.jpg", "p1.jpg"]));
        assert_eq!(layout.front_cover, None);
        assert!(layout.back_cover.is_empty());
        assert_eq!(layout.into_sequence(), names(&["bok.jpg", "p1.jpg"]));
    }

    #[test]
    fn empty_input_is_empty_output() {
        let layout = layout_pages(Vec::<String>::new());
        assert!(layout.is_empty());
        assert!(layout.into_sequence().is_empty());
    }

    #[test]
    fn first_matching_tag_wins() {
        // "covbok" is a cover, "bokleg" a title page, "legfow" a copyright page.
        let input = names(&["legfow.jpg", "bokleg.jpg", "covbok.jpg", "p.jpg"]);
        let layout = layout_pages(input);
        assert_eq!(layout.front_cover.as_deref(), Some("covbok.jpg"));
        assert_eq!(layout.title, names(&["bokleg.jpg"]));
        assert_eq!(layout.copyright, names(&["legfow.jpg"]));
        assert!(layout.foreword.is_empty());

        assert_eq!(RoleTag::classify("covbok.jpg"), Some(RoleTag::Cover));
        assert_eq!(RoleTag::classify("bokleg.jpg"), Some(RoleTag::Title));
        assert_eq!(RoleTag::classify("legfow.jpg"), Some(RoleTag::Copyright));
        assert_eq!(RoleTag::classify("000001.jpg"), None);
    }

    #[test]
    fn reorder_is_a_permutation() {
        let input = names(&[
            "fow002.jpg", "000002.jpg", "cov002.jpg", "leg001.jpg", "bok001.jpg",
            "000001.jpg", "fow001.jpg", "cov001.jpg", "!00001.jpg",
        ]);
        let out = reorder_pages(input.clone());
        assert_eq!(out.len(), input.len());

        let mut sorted_in = input;
        let mut sorted_out = out.clone();
        sorted_in.sort();
        sorted_out.sort();
        assert_eq!(sorted_in, sorted_out);

        assert_eq!(
            out,
            names(&[
                "cov002.jpg", "bok001.jpg", "leg001.jpg", "fow002.jpg", "fow001.jpg",
                "000002.jpg", "000001.jpg", "!00001.jpg", "cov001.jpg",
            ])
        );
    }

    #[test]
    fn summary_counts_groups() {
        let layout = layout_pages(names(&["cov1", "cov2", "cov3", "bok", "fow", "p1", "p2"]));
        assert_eq!(
            layout.summary(),
            PageLayoutSummary {
                front_cover: 1,
                title: 1,
                copyright: 0,
                foreword: 1,
                body: 2,
                back_cover: 2,
            }
        );
        assert_eq!(layout.len(), 7);
    }

    #[test]
    fn works_with_borrowed_names() {
        let input = vec!["p1.jpg", "cov.jpg"];
        assert_eq!(reorder_pages(input), vec!["cov.jpg", "p1.jpg"]);
    }

    // ── Properties over generated page sets ──────────────────────────────

    use proptest::prelude::*;

    const TAGGED_FRAGMENTS: &[&str] = &["cov", "bok", "leg", "fow", "00", "p", "_", "ov", "bo"];
    const UNTAGGED_FRAGMENTS: &[&str] = &["00", "p", "_", "x", "ov", "bo", "le", "fo"];

    /// Unique page names built from `fragments`; the index suffix keeps
    /// every name distinct so positions can be recovered.
    fn page_set(fragments: &'static [&'static str]) -> impl Strategy<Value = Vec<String>> {
        prop::collection::vec(
            prop::collection::vec(prop::sample::select(fragments), 0..4),
            0..24,
        )
        .prop_map(|pages| {
            pages
                .into_iter()
                .enumerate()
                .map(|(i, parts)| format!("{}#{i:02}.jpg", parts.concat()))
                .collect()
        })
    }

    fn positions(input: &[String], group: &[String]) -> Vec<usize> {
        group
            .iter()
            .map(|name| input.iter().position(|p| p == name).unwrap())
            .collect()
    }

    fn is_increasing(v: &[usize]) -> bool {
        v.windows(2).all(|w| w[0] < w[1])
    }

    proptest! {
        #[test]
        fn prop_reorder_is_a_permutation(input in page_set(TAGGED_FRAGMENTS)) {
            let mut out = reorder_pages(input.clone());
            let mut sorted_in = input;
            out.sort();
            sorted_in.sort();
            prop_assert_eq!(out, sorted_in);
        }

        #[test]
        fn prop_groups_keep_input_order(input in page_set(TAGGED_FRAGMENTS)) {
            let layout = layout_pages(input.clone());

            let covers: Vec<String> = layout
                .front_cover
                .iter()
                .chain(&layout.back_cover)
                .cloned()
                .collect();
            for group in [&covers, &layout.title, &layout.copyright, &layout.foreword, &layout.body] {
                prop_assert!(is_increasing(&positions(&input, group)), "group {:?}", group);
            }

            prop_assert!(covers.iter().all(|p| RoleTag::classify(p) == Some(RoleTag::Cover)));
            prop_assert!(layout.title.iter().all(|p| RoleTag::classify(p) == Some(RoleTag::Title)));
            prop_assert!(layout.copyright.iter().all(|p| RoleTag::classify(p) == Some(RoleTag::Copyright)));
            prop_assert!(layout.foreword.iter().all(|p| RoleTag::classify(p) == Some(RoleTag::Foreword)));
            prop_assert!(layout.body.iter().all(|p| RoleTag::classify(p).is_none()));
        }

        #[test]
        fn prop_untagged_input_passes_through(input in page_set(UNTAGGED_FRAGMENTS)) {
            prop_assert_eq!(reorder_pages(input.clone()), input);
        }

        #[test]
        fn prop_extract_is_idempotent(
            input in page_set(TAGGED_FRAGMENTS),
            tag in prop::sample::select(RoleTag::ALL.to_vec()),
        ) {
            let (hit, rest) = extract_special_pages(input.clone(), tag.tag());
            prop_assert_eq!(hit.len() + rest.len(), input.len());
            prop_assert!(is_increasing(&positions(&input, &hit)));
            prop_assert!(is_increasing(&positions(&input, &rest)));

            let (again, rest_again) = extract_special_pages(rest.clone(), tag.tag());
            prop_assert!(again.is_empty());
            prop_assert_eq!(rest_again, rest);

            let (hit_again, leftover) = extract_special_pages(hit.clone(), tag.tag());
            prop_assert_eq!(hit_again, hit);
            prop_assert!(leftover.is_empty());
        }
    }
}

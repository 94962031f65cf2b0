//! End-to-end navigation sequences across directory boundaries.
//!
//! These walk a session through the same journeys the toolkit's demo
//! pages take: internal pages, externally loaded pages in the base
//! directory and in a sibling content directory, relative
//! `change_page` calls, form submissions, and the base-tag handling
//! variants.

use crate::config::NavConfig;
use crate::engine::{ChangeOptions, NavDirective, PageTransitionController};
use crate::page::{Form, Page};
use crate::test_utils::commit_navigation;
use opal_types::NavError;

const HOME: &str = "/app/index.html";

fn controller_with(push_state: bool, base_supported: bool) -> PageTransitionController {
    let config = NavConfig {
        push_state_supported: push_state,
        dynamic_base_supported: base_supported,
        ..NavConfig::default()
    };
    PageTransitionController::new(HOME, config).unwrap()
}

#[test]
fn navigate_between_internal_and_external_pages() {
    for push_state in [true, false] {
        let mut ctl = controller_with(push_state, true);

        // Default internal page to another internal page.
        let location = commit_navigation(&mut ctl, "#internal-page-2", Page::internal("internal-page-2"));
        assert_eq!(location, "/app/index.html#internal-page-2");
        assert_eq!(ctl.session().history().len(), 2);

        // To a page in the base directory. The document and this page
        // are *not* in the same directory.
        let location = commit_navigation(
            &mut ctl,
            "base/base-page-1.html",
            Page::external("/app/base/base-page-1.html"),
        );
        if push_state {
            assert_eq!(location, "/app/base/base-page-1.html");
        } else {
            assert_eq!(location, "/app/index.html#/app/base/base-page-1.html");
        }

        // Same directory as the current page, not the document.
        let location = commit_navigation(
            &mut ctl,
            "base-page-2.html",
            Page::external("/app/base/base-page-2.html"),
        );
        assert!(location.ends_with("/app/base/base-page-2.html"));

        // Into a sibling directory hierarchy.
        let location = commit_navigation(
            &mut ctl,
            "../content/content-page-1.html",
            Page::external("/app/content/content-page-1.html"),
        );
        assert!(location.ends_with("/app/content/content-page-1.html"));

        // Within the same non-base directory hierarchy.
        let location = commit_navigation(
            &mut ctl,
            "content-page-2.html",
            Page::external("/app/content/content-page-2.html"),
        );
        assert!(location.ends_with("/app/content/content-page-2.html"));

        // Back to an internal page.
        let location = commit_navigation(&mut ctl, "#internal-page-1", Page::internal("internal-page-1"));
        assert_eq!(location, "/app/index.html#internal-page-1");

        // change_page() with a filename (no path) resolves against the
        // internal page's directory: the document's.
        let location = commit_navigation(
            &mut ctl,
            "base/base-page-1.html",
            Page::external("/app/base/base-page-1.html"),
        );
        assert!(location.ends_with("/app/base/base-page-1.html"));

        // change_page() with an up-level relative path.
        let location = commit_navigation(
            &mut ctl,
            "../content/content-page-1.html",
            Page::external("/app/content/content-page-1.html"),
        );
        assert!(location.ends_with("/app/content/content-page-1.html"));

        // change_page() with a page id.
        let location = commit_navigation(&mut ctl, "#internal-page-2", Page::internal("internal-page-2"));
        assert_eq!(location, "/app/index.html#internal-page-2");

        // A page id missing its '#' prefix must not change the page.
        let stack_len = ctl.session().history().len();
        let err = ctl
            .change_page("internal-page-1", ChangeOptions::default())
            .unwrap_err();
        assert!(matches!(err, NavError::UnresolvableTarget(_)));
        assert_eq!(ctl.location(), "/app/index.html#internal-page-2");
        assert_eq!(ctl.session().history().len(), stack_len);
    }
}

#[test]
fn internal_form_with_no_action_submits_to_document_url() {
    let mut ctl = controller_with(true, true);
    commit_navigation(
        &mut ctl,
        "#internal-no-action-form-page",
        Page::internal("internal-no-action-form-page"),
    );

    let form = Form {
        action: None,
        fields: vec![
            ("foo".to_string(), "1".to_string()),
            ("bar".to_string(), "2".to_string()),
        ],
    };
    let NavDirective::Load { seq, url } = ctl.submit_form(&form, ChangeOptions::default()).unwrap()
    else {
        panic!("expected load directive");
    };
    // The document URL, not the base directory.
    assert_eq!(url.pathname(), "/app/index.html");

    let NavDirective::Transition { seq, .. } = ctl
        .load_finished(seq, Ok(Page::external("/app/index.html")))
        .unwrap()
    else {
        panic!("expected transition directive");
    };
    ctl.transition_finished(seq, Ok(())).unwrap();
    assert_eq!(ctl.location(), "/app/index.html?foo=1&bar=2");
}

#[test]
fn external_page_form_with_no_action_submits_to_page_url() {
    let mut ctl = controller_with(true, true);
    commit_navigation(
        &mut ctl,
        "/app/content/content-page-1.html",
        Page::external("/app/content/content-page-1.html"),
    );

    let form = Form {
        action: None,
        fields: vec![
            ("foo".to_string(), "1".to_string()),
            ("bar".to_string(), "2".to_string()),
        ],
    };
    let NavDirective::Load { seq, url } = ctl.submit_form(&form, ChangeOptions::default()).unwrap()
    else {
        panic!("expected load directive");
    };
    // The page URL, not the document URL.
    assert_eq!(url.pathname(), "/app/content/content-page-1.html");

    let NavDirective::Transition { seq, .. } = ctl
        .load_finished(seq, Ok(Page::external("/app/content/content-page-1.html")))
        .unwrap()
    else {
        panic!("expected transition directive");
    };
    ctl.transition_finished(seq, Ok(())).unwrap();
    assert_eq!(ctl.location(), "/app/content/content-page-1.html?foo=1&bar=2");
}

#[test]
fn disabling_base_handling_prevents_base_and_link_changes() {
    let config = NavConfig {
        dynamic_base_enabled: false,
        ..NavConfig::default()
    };
    let mut ctl = PageTransitionController::new(HOME, config).unwrap();

    let NavDirective::Load { seq, .. } = ctl
        .change_page("/app/base/base-change.html", ChangeOptions::default())
        .unwrap()
    else {
        panic!("expected load directive");
    };
    let page = Page::external("/app/base/base-change.html").with_link("foo");
    let directive = ctl.load_finished(seq, Ok(page)).unwrap();
    let NavDirective::Transition {
        seq,
        page: Some(inserted),
        ..
    } = directive
    else {
        panic!("expected transition directive with page");
    };
    // Link hrefs remain untouched.
    assert_eq!(inserted.links[0].href, "foo");
    ctl.transition_finished(seq, Ok(())).unwrap();

    // And the base stays at the document directory.
    assert_eq!(ctl.session().base().current_directory(), "/app/");
}

#[test]
fn dynamic_base_follows_committed_page_directory() {
    let mut ctl = controller_with(true, true);
    commit_navigation(
        &mut ctl,
        "/app/base/base-change.html",
        Page::external("/app/base/base-change.html").with_link("foo"),
    );
    // The ambient base moved, so the relative link needs no rewrite.
    assert_eq!(ctl.session().base().current_directory(), "/app/base/");
}

#[test]
fn degraded_base_rewrites_inserted_page_links() {
    let mut ctl = controller_with(true, false);

    let NavDirective::Load { seq, .. } = ctl
        .change_page("/app/base/base-change.html", ChangeOptions::default())
        .unwrap()
    else {
        panic!("expected load directive");
    };
    let page = Page::external("/app/base/base-change.html").with_link("foo");
    let directive = ctl.load_finished(seq, Ok(page)).unwrap();
    let NavDirective::Transition {
        seq,
        page: Some(inserted),
        ..
    } = directive
    else {
        panic!("expected transition directive with page");
    };
    // The ambient base could not move; the link was rewritten against
    // the page's directory instead.
    assert_eq!(inserted.links[0].href, "/app/base/foo");
    ctl.transition_finished(seq, Ok(())).unwrap();
    assert_eq!(ctl.session().base().current_directory(), "/app/");
}

#[test]
fn back_and_forward_across_directory_boundaries() {
    let mut ctl = controller_with(true, true);
    commit_navigation(&mut ctl, "#internal-page-2", Page::internal("internal-page-2"));
    commit_navigation(
        &mut ctl,
        "/app/base/base-page-1.html",
        Page::external("/app/base/base-page-1.html"),
    );

    // Native back twice, then forward once.
    ctl.handle_location_change("/app/index.html#internal-page-2").unwrap();
    assert_eq!(ctl.location(), "/app/index.html#internal-page-2");
    assert_eq!(ctl.session().base().current_directory(), "/app/");

    ctl.handle_location_change("/app/index.html").unwrap();
    assert_eq!(ctl.location(), "/app/index.html");

    ctl.handle_location_change("/app/base/base-page-1.html").unwrap();
    assert_eq!(ctl.location(), "/app/base/base-page-1.html");
    assert_eq!(ctl.session().base().current_directory(), "/app/base/");
    assert_eq!(ctl.session().history().len(), 3);
}

//! JavaScript evaluated inside the page
//!
//! Kept as constants so the scripted test driver can recognise them.

/// Top-card fields of a public profile, read straight from the rendered DOM.
pub const DOM_SNAPSHOT_JS: &str = r#"(() => {
    const text = (selector) => {
        const el = document.querySelector(selector);
        return el ? (el.innerText || el.textContent || '') : null;
    };
    const texts = (selector) =>
        Array.from(document.querySelectorAll(selector)).map((el) => el.innerText || el.textContent || '');
    return {
        heading: text('h1.top-card-layout__title') ?? text('main h1') ?? text('h1'),
        headline: text('.top-card-layout__headline'),
        location: text('.top-card-layout__first-subline .not-first-middot span')
            ?? text('.profile-info-subheader .not-first-middot span')
            ?? text('.top-card__subline-item'),
        about: text('[data-section="summary"] .core-section-container__content')
            ?? text('section.summary p'),
        currentCompany: text('[data-section="currentPositionsDetails"] .top-card-link__description'),
        educationTop: text('[data-section="educationsDetails"] .top-card-link__description'),
        subline: texts('.top-card-layout__first-subline span, .top-card__subline-item, .top-card-layout__second-subline span'),
    };
})()"#;

/// List item texts under the section whose heading matches `label`, or
/// `null` when there is no such heading or it has no enclosing section.
pub const SECTION_ITEMS_FN: &str = r#"(label) => {
    const norm = (s) => (s || '').replace(/\s+/g, ' ').trim().toLowerCase();
    const wanted = norm(label);
    const heading = Array.from(document.querySelectorAll('h1, h2, h3, h4, h5, h6'))
        .find((h) => norm(h.innerText || h.textContent) === wanted);
    if (!heading) return null;
    const container = heading.closest('section');
    if (!container) return null;
    return Array.from(container.querySelectorAll('li'))
        .map((li) => li.innerText || li.textContent || '');
}"#;

/// Scroll down by one viewport.
pub const SCROLL_STEP_JS: &str = "window.scrollBy(0, Math.max(window.innerHeight, 400)); true";

/// Bottom edge of the viewport and total document height, in CSS pixels.
pub const SCROLL_POSITION_JS: &str = r#"({
    bottom: window.scrollY + window.innerHeight,
    height: Math.max(document.body ? document.body.scrollHeight : 0, document.documentElement.scrollHeight)
})"#;

pub const READY_STATE_JS: &str = "document.readyState";

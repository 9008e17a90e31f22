//! User-Agent Stylesheet
//!
//! [WHATWG HTML § 15 Rendering](https://html.spec.whatwg.org/multipage/rendering.html)
//!
//! "User agents are expected to have a default style sheet that presents elements
//! of HTML documents in ways consistent with general user expectations."
//!
//! UA rules go first in the rule list. With equal specificity any author
//! rule that comes later overrides them.

use std::sync::OnceLock;

use crate::parser::{Stylesheet, parse_stylesheet};

/// Default CSS rules for the elements Wren gives special treatment.
///
/// Only tag and descendant selectors are understood, so there are no
/// selector lists here: each tag gets its own rule.
const UA_CSS: &str = r"
/* [§ 15.3.1 Hidden elements] */
head { display: none; }
script { display: none; }
style { display: none; }
title { display: none; }

/* [§ 15.3.7 Phrasing content] */
a { color: blue; }
i { font-style: italic; }
em { font-style: italic; }
b { font-weight: bold; }
strong { font-weight: bold; }
small { font-size: 90%; }
big { font-size: 110%; }

/* [§ 15.3.6 Sections and headings] */
h1 { font-size: 200%; font-weight: bold; }
h2 { font-size: 150%; font-weight: bold; }
h3 { font-size: 117%; font-weight: bold; }

pre { background-color: gray; }
";

/// Return the parsed UA stylesheet, parsing only once.
///
/// The stylesheet is parsed once and cached via `OnceLock`.
pub fn ua_stylesheet() -> &'static Stylesheet {
    static STYLESHEET: OnceLock<Stylesheet> = OnceLock::new();
    STYLESHEET.get_or_init(|| parse_stylesheet(UA_CSS))
}

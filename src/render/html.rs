// SPDX-License-Identifier: PMPL-1.0-or-later

//! HTML building blocks shared by every page

use crate::analytics::{AnalyticsEvent, Ga4Config};
use crate::i18n::{Lang, Translator};

/// Site-wide settings a page needs to build links.
#[derive(Debug, Clone)]
pub struct RenderContext {
    /// Public URL prefix of the site, always ending in `/`.
    pub base_url: String,
    /// Language rendered at the site root; others live under `<code>/`.
    pub default_lang: Lang,
    /// Languages offered in the switcher.
    pub languages: Vec<Lang>,
    pub ga4: Option<Ga4Config>,
}

impl RenderContext {
    pub fn new(base_url: &str, default_lang: Lang) -> Self {
        let mut base_url = base_url.trim().to_string();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }
        Self {
            base_url,
            default_lang,
            languages: Lang::all().to_vec(),
            ga4: None,
        }
    }

    /// Directory prefix of `lang`'s page tree relative to the site root.
    pub fn lang_prefix(&self, lang: Lang) -> String {
        if lang == self.default_lang {
            String::new()
        } else {
            format!("{}/", lang.code())
        }
    }

    /// Public URL of `route` (relative to a language tree) in `lang`.
    pub fn url(&self, lang: Lang, route: &str) -> String {
        format!("{}{}{}", self.base_url, self.lang_prefix(lang), route)
    }
}

impl Default for RenderContext {
    fn default() -> Self {
        Self::new("/", Lang::default())
    }
}

/// Escape text for use in element content and quoted attributes.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Serialize `value` for embedding inside a `<script>` element.
pub fn script_json(value: &serde_json::Value) -> String {
    value
        .to_string()
        .replace("</", "<\\/")
        .replace("<!--", "<\\!--")
}

/// `data-track` attributes a client script turns into analytics events.
pub fn track_attrs(event: &AnalyticsEvent) -> String {
    let params = serde_json::Value::Object(event.params()).to_string();
    format!(
        " data-track=\"{}\" data-track-params=\"{}\"",
        event.name(),
        escape(&params)
    )
}

/// Full document around `body`.
///
/// `route` is the page's path inside its language tree; the language
/// switcher links to the same route in every offered language.
pub fn page_shell(
    ctx: &RenderContext,
    tr: &Translator<'_>,
    title: &str,
    route: &str,
    body: &str,
) -> String {
    let site_title = tr.t("site.title");
    let full_title = if title.is_empty() || title == site_title {
        site_title.clone()
    } else {
        format!("{} · {}", title, site_title)
    };

    let mut head = String::new();
    head.push_str("<meta charset=\"utf-8\">\n");
    head.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    head.push_str(&format!("<title>{}</title>\n", escape(&full_title)));
    head.push_str(&format!(
        "<meta name=\"description\" content=\"{}\">\n",
        escape(&tr.t("site.tagline"))
    ));
    for lang in &ctx.languages {
        head.push_str(&format!(
            "<link rel=\"alternate\" hreflang=\"{}\" href=\"{}\">\n",
            lang.code(),
            escape(&ctx.url(*lang, route))
        ));
    }
    if let Some(ga4) = &ctx.ga4 {
        head.push_str(&ga4.snippet());
        head.push('\n');
    }

    format!(
        concat!(
            "<!DOCTYPE html>\n",
            "<html lang=\"{lang}\">\n",
            "<head>\n{head}</head>\n",
            "<body{page_view}>\n",
            "<header class=\"site-header\">\n",
            "<a class=\"brand\" href=\"{home}\">{site_title}</a>\n",
            "{switcher}",
            "</header>\n",
            "<main>\n{body}</main>\n",
            "<footer class=\"site-footer\">{footer}</footer>\n",
            "</body>\n",
            "</html>\n"
        ),
        lang = tr.lang().code(),
        head = head,
        page_view = track_attrs(&AnalyticsEvent::PageView {
            path: ctx.url(tr.lang(), route),
        }),
        home = escape(&ctx.url(tr.lang(), "")),
        site_title = escape(&site_title),
        switcher = language_switcher(ctx, tr, route),
        body = body,
        footer = escape(&tr.t("site.footer")),
    )
}

fn language_switcher(ctx: &RenderContext, tr: &Translator<'_>, route: &str) -> String {
    if ctx.languages.len() < 2 {
        return String::new();
    }

    let mut out = format!(
        "<nav class=\"language-switcher\" aria-label=\"{}\">\n",
        escape(&tr.t("language.label"))
    );
    for lang in &ctx.languages {
        let current = if *lang == tr.lang() {
            " aria-current=\"true\""
        } else {
            ""
        };
        out.push_str(&format!(
            "<a href=\"{}\" hreflang=\"{}\"{}{}>{}</a>\n",
            escape(&ctx.url(*lang, route)),
            lang.code(),
            current,
            track_attrs(&AnalyticsEvent::LanguageChange { language: *lang }),
            escape(lang.native_name())
        ));
    }
    out.push_str("</nav>\n");
    out
}

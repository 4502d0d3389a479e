use serde::Deserialize;

/// A structural query against the page, either CSS or XPath.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Selector {
    Css(String),
    #[serde(rename = "xpath")]
    XPath(String),
}

impl Selector {
    pub fn css(query: &str) -> Self {
        Selector::Css(query.to_string())
    }

    pub fn xpath(query: &str) -> Self {
        Selector::XPath(query.to_string())
    }
}

impl std::fmt::Display for Selector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Selector::Css(q) => write!(f, "css={}", q),
            Selector::XPath(q) => write!(f, "xpath={}", q),
        }
    }
}

/// One selector candidate for a field. Reads inner text unless `attr` names
/// an attribute to read instead.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FieldQuery {
    #[serde(flatten)]
    pub selector: Selector,
    #[serde(default)]
    pub attr: Option<String>,
}

impl FieldQuery {
    pub fn text(selector: Selector) -> Self {
        FieldQuery {
            selector,
            attr: None,
        }
    }

    pub fn attr(selector: Selector, attr: &str) -> Self {
        FieldQuery {
            selector,
            attr: Some(attr.to_string()),
        }
    }
}

impl From<Selector> for FieldQuery {
    fn from(selector: Selector) -> Self {
        FieldQuery::text(selector)
    }
}

/// Ordered candidate lists for every field the scraper reads off the maps UI.
///
/// These track the live markup and break whenever it changes, so they are
/// plain data that `configuration/base.yaml` can override wholesale.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SelectorConfig {
    pub search_box: Selector,
    pub listing: Selector,
    /// Resolved relative to a listing anchor to find what gets clicked.
    pub listing_target: Option<Selector>,
    pub place_title: Selector,

    pub name: Vec<FieldQuery>,
    pub address: Vec<FieldQuery>,
    pub website: Vec<FieldQuery>,
    pub phone: Vec<FieldQuery>,
    pub review_count: Vec<FieldQuery>,
    pub rating: Vec<FieldQuery>,
    pub image: Vec<Selector>,
    pub background_image: Selector,
    pub image_denylist: Vec<String>,

    pub reviews_tab: Selector,
    pub review_probe: Selector,
    pub review_items: Vec<Selector>,
    pub review_author: Vec<FieldQuery>,
    pub review_rating: Vec<FieldQuery>,
    pub review_date: Vec<FieldQuery>,
    pub review_content: Vec<FieldQuery>,
}

fn xpaths(queries: &[&str]) -> Vec<FieldQuery> {
    queries
        .iter()
        .map(|q| FieldQuery::text(Selector::xpath(q)))
        .collect()
}

fn csss(queries: &[&str]) -> Vec<FieldQuery> {
    queries
        .iter()
        .map(|q| FieldQuery::text(Selector::css(q)))
        .collect()
}

impl Default for SelectorConfig {
    fn default() -> Self {
        SelectorConfig {
            search_box: Selector::xpath(r#"//input[@id="searchboxinput"]"#),
            listing: Selector::xpath(r#"//a[contains(@href, "/maps/place/")]"#),
            listing_target: Some(Selector::xpath("..")),
            place_title: Selector::xpath(r#"//h1[contains(@class, "DUwDvf")]"#),

            name: xpaths(&[
                r#"//div[@class="TIHn2 "]//h1[@class="DUwDvf lfPIob"]"#,
                r#"//h1[contains(@class, "DUwDvf")]"#,
                r#"//h1[@data-attrid="title"]"#,
                r#"//div[contains(@class, "SPZz6b")]//h1"#,
            ]),
            address: xpaths(&[
                r#"//button[@data-item-id="address"]//div[contains(@class, "fontBodyMedium")]"#,
                r#"//div[@data-item-id="address"]//div[contains(@class, "fontBodyMedium")]"#,
                r#"//span[contains(@class, "LrzXr")]"#,
                r#"//div[contains(@class, "AeaXub")]//div[contains(@class, "fontBodyMedium")]"#,
            ]),
            website: vec![
                FieldQuery::attr(Selector::xpath(r#"//a[@data-item-id="authority"]"#), "href"),
                FieldQuery::text(Selector::xpath(
                    r#"//a[@data-item-id="authority"]//div[contains(@class, "fontBodyMedium")]"#,
                )),
                FieldQuery::text(Selector::xpath(r#"//a[@data-item-id="authority"]"#)),
            ],
            phone: xpaths(&[
                r#"//button[contains(@data-item-id, "phone:tel:")]//div[contains(@class, "fontBodyMedium")]"#,
                r#"//div[contains(@data-item-id, "phone")]//div[contains(@class, "fontBodyMedium")]"#,
                r#"//a[starts-with(@href, "tel:")]"#,
                r#"//span[contains(@class, "LrzXr") and contains(text(), "+")]"#,
            ]),
            review_count: xpaths(&[
                r#"//div[@class="TIHn2 "]//div[@class="fontBodyMedium dmRWX"]//div//span//span//span[@aria-label]"#,
                r#"//span[contains(@aria-label, "reviews")]"#,
                r#"//div[contains(@class, "dmRWX")]//span[contains(text(), "(")]"#,
            ]),
            rating: xpaths(&[
                r#"//div[@class="TIHn2 "]//div[@class="fontBodyMedium dmRWX"]//div//span[@aria-hidden]"#,
                r#"//span[contains(@class, "ceNzKf")]"#,
                r#"//div[contains(@class, "dmRWX")]//span[not(contains(text(), "("))]"#,
            ]),
            image: [
                r#"//div[contains(@class, "ZKCDEc")]//img"#,
                r#"//div[contains(@class, "UCw5gc")]//img"#,
                r#"//img[contains(@class, "wXeWr")]"#,
                r#"//button[contains(@jsaction, "hero")]//img"#,
                r#"//div[@data-value="Photo"]//img"#,
                r#"//div[contains(@class, "AoGLv")]//img"#,
                r#"//img[contains(@src, "googleusercontent")]"#,
                r#"//img[contains(@class, "RZ66Rb")]"#,
            ]
            .iter()
            .map(|q| Selector::xpath(q))
            .collect(),
            background_image: Selector::xpath(r#"//div[contains(@style, "background-image")]"#),
            image_denylist: [
                "data:image/svg",
                "placeholder",
                "blank.gif",
                "spacer.gif",
                "1x1.png",
                "loading.gif",
                "default",
            ]
            .iter()
            .map(|p| p.to_string())
            .collect(),

            reviews_tab: Selector::css(r#"button[data-tab-index="1"]"#),
            review_probe: Selector::css("div[data-review-id]"),
            review_items: [
                "div[data-review-id]",
                r#"div[jsaction*="review"]"#,
                "div.gws-localreviews__google-review",
                r#"div[class*="review"]"#,
                ".wiI7pd",
            ]
            .iter()
            .map(|q| Selector::css(q))
            .collect(),
            review_author: csss(&[
                ".d4r55",
                r#"div[class*="TSUbDb"] span"#,
                "span.X43Kjb",
                "div.TSUbDb a",
                r#"[data-href*="contrib"]"#,
            ]),
            review_rating: [
                r#"span[class*="kvMYJc"]"#,
                r#"div[class*="DU9Pgb"] span"#,
                "span.fzvQIb",
                "g-review-stars span",
            ]
            .iter()
            .flat_map(|q| {
                [
                    FieldQuery::attr(Selector::css(q), "aria-label"),
                    FieldQuery::text(Selector::css(q)),
                ]
            })
            .collect(),
            review_date: csss(&[
                "span.rsqaWe",
                r#"span[class*="dehysf"]"#,
                "span.p2TkOb",
                "div.DU9Pgb span",
            ]),
            review_content: csss(&[
                r#"span[jsname="bN97Pc"]"#,
                r#"div[class*="MyEned"] span"#,
                "span.wiI7pd",
                "div.k8MTF span",
                "span[data-expandable-section]",
            ]),
        }
    }
}

//! 详情页提取服务 - 业务能力层
//!
//! HTML 快照 → ExtractedRecord 的纯函数。
//!
//! 同一语义字段在不同详情页可能渲染成不同的标记结构，因此每个字段
//! 维护一组按序尝试的提取策略，首个命中者生效；单个字段失败不影响
//! 其他字段。

use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use crate::models::ExtractedRecord;

/// 上架日期标签文本
const LAUNCHED_LABEL: &str = "Launched";
/// 评分定义项文本
const RATING_LABEL: &str = "Rating";
/// 次级文本样式标记（值节点携带）
const SECONDARY_TEXT_CLASS: &str = "tw-text-fg-secondary";

/// 单字段提取策略：命中返回字段值，未命中返回 None
type FieldStrategy = fn(&Html) -> Option<String>;

/// 上架日期的策略表，按序尝试，首个命中生效
const LAUNCH_DATE_STRATEGIES: &[FieldStrategy] =
    &[launched_adjacent_label, launched_grid_container];

/// 从详情页 HTML 快照提取结构化记录
///
/// 永不失败：每个字段各自尽力，缺失即 None / "Unknown"
pub fn extract_record(html: &str) -> ExtractedRecord {
    let doc = Html::parse_document(html);

    let (rating, total_reviews) = extract_rating(&doc);

    ExtractedRecord {
        app_name: extract_app_name(&doc),
        launch_date: LAUNCH_DATE_STRATEGIES
            .iter()
            .find_map(|strategy| strategy(&doc)),
        rating,
        total_reviews,
    }
}

/// 应用名称：首个顶级标题的文本，缺失时为 "Unknown"
fn extract_app_name(doc: &Html) -> String {
    let Ok(sel) = Selector::parse("h1") else {
        return "Unknown".to_string();
    };
    doc.select(&sel)
        .next()
        .map(|h1| element_text(&h1))
        .filter(|text| !text.is_empty())
        .unwrap_or_else(|| "Unknown".to_string())
}

/// 策略 1：文本恰为 "Launched" 的段落，其下一个段落若带次级文本
/// 样式标记，则取其内容
fn launched_adjacent_label(doc: &Html) -> Option<String> {
    let sel = Selector::parse("p").ok()?;
    let paragraphs: Vec<ElementRef<'_>> = doc.select(&sel).collect();

    let label_index = paragraphs
        .iter()
        .position(|p| element_text(p) == LAUNCHED_LABEL)?;

    let value = paragraphs.get(label_index + 1)?;
    if has_class(value, SECONDARY_TEXT_CLASS) {
        Some(element_text(value))
    } else {
        None
    }
}

/// 策略 2：扫描网格容器，找到同时包含 "Launched" 标签和次级样式
/// 值段落的那一个
fn launched_grid_container(doc: &Html) -> Option<String> {
    let grid_sel = Selector::parse("div.tw-grid").ok()?;
    let p_sel = Selector::parse("p").ok()?;
    let value_sel = Selector::parse("p.tw-text-fg-secondary").ok()?;

    for grid in doc.select(&grid_sel) {
        let has_label = grid
            .select(&p_sel)
            .any(|p| element_text(&p) == LAUNCHED_LABEL);
        if !has_label {
            continue;
        }
        if let Some(value) = grid.select(&value_sel).next() {
            return Some(element_text(&value));
        }
    }
    None
}

/// 评分与评论数：文本恰为 "Rating" 的 dt，取其最近的祖先 div 里
/// 与之配对的 dd；评分来自次级样式 span，评论数从相邻链接的
/// aria-label 中按 "<number> Review(s)" 解析
fn extract_rating(doc: &Html) -> (Option<String>, Option<String>) {
    let Some(dd) = rating_value_node(doc) else {
        return (None, None);
    };

    let rating = Selector::parse("span.tw-text-fg-secondary")
        .ok()
        .and_then(|sel| dd.select(&sel).next())
        .map(|span| element_text(&span))
        .filter(|text| !text.is_empty());

    let total_reviews = Selector::parse(r#"a[aria-label*="Review"]"#)
        .ok()
        .and_then(|sel| dd.select(&sel).next())
        .and_then(|link| link.value().attr("aria-label").map(str::to_string))
        .and_then(|label| parse_review_count(&label));

    (rating, total_reviews)
}

/// 定位 "Rating" 定义项配对的定义值节点
fn rating_value_node(doc: &Html) -> Option<ElementRef<'_>> {
    let dt_sel = Selector::parse("dt").ok()?;
    let dd_sel = Selector::parse("dd").ok()?;

    let rating_dt = doc
        .select(&dt_sel)
        .find(|dt| element_text(dt) == RATING_LABEL)?;

    let parent_div = rating_dt
        .ancestors()
        .filter_map(ElementRef::wrap)
        .find(|el| el.value().name() == "div")?;

    parent_div.select(&dd_sel).next()
}

/// 从 aria-label 中解析评论数，如 "1203 Reviews" / "1 Review"
fn parse_review_count(label: &str) -> Option<String> {
    let re = Regex::new(r"(?i)(\d+)\s+Reviews?").ok()?;
    re.captures(label)
        .and_then(|cap| cap.get(1))
        .map(|m| m.as_str().to_string())
}

fn element_text(el: &ElementRef<'_>) -> String {
    el.text().collect::<String>().trim().to_string()
}

fn has_class(el: &ElementRef<'_>, class: &str) -> bool {
    el.value().classes().any(|c| c == class)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PRIMARY_SHAPE: &str = r#"
        <html><body>
          <h1> Demo App </h1>
          <div>
            <p>Launched</p>
            <p class="tw-text-fg-secondary">March 12, 2025</p>
          </div>
        </body></html>
    "#;

    // 标签和值之间隔着别的段落，策略 1 不命中，只能靠网格容器策略
    const FALLBACK_SHAPE: &str = r#"
        <html><body>
          <h1>Demo App</h1>
          <div class="tw-grid">
            <div><p>Launched</p><p>Built for Shopify</p></div>
            <div><p class="tw-text-fg-secondary">March 12, 2025</p></div>
          </div>
        </body></html>
    "#;

    const RATING_SHAPE: &str = r##"
        <html><body>
          <h1>Demo App</h1>
          <div>
            <dt>Rating</dt>
            <dd>
              <span class="tw-text-fg-secondary">4.8</span>
              <a aria-label="1203 Reviews" href="#reviews">reviews</a>
            </dd>
          </div>
        </body></html>
    "##;

    #[test]
    fn test_primary_shape_launch_date() {
        let record = extract_record(PRIMARY_SHAPE);
        assert_eq!(record.app_name, "Demo App");
        assert_eq!(record.launch_date.as_deref(), Some("March 12, 2025"));
    }

    #[test]
    fn test_fallback_shape_launch_date() {
        let record = extract_record(FALLBACK_SHAPE);
        assert_eq!(record.launch_date.as_deref(), Some("March 12, 2025"));
    }

    #[test]
    fn test_neither_shape_yields_none() {
        let record = extract_record("<html><body><h1>App</h1><p>Launched</p></body></html>");
        // 标签后没有带次级样式的值节点，两种策略都不命中
        assert_eq!(record.launch_date, None);
    }

    #[test]
    fn test_label_without_secondary_class_rejected() {
        let html = r#"
            <html><body>
              <p>Launched</p>
              <p class="other-style">March 12, 2025</p>
            </body></html>
        "#;
        let record = extract_record(html);
        assert_eq!(record.launch_date, None);
    }

    #[test]
    fn test_rating_and_reviews() {
        let record = extract_record(RATING_SHAPE);
        assert_eq!(record.rating.as_deref(), Some("4.8"));
        assert_eq!(record.total_reviews.as_deref(), Some("1203"));
    }

    #[test]
    fn test_rating_absent() {
        let record = extract_record(PRIMARY_SHAPE);
        assert_eq!(record.rating, None);
        assert_eq!(record.total_reviews, None);
    }

    #[test]
    fn test_singular_review_label() {
        let html = r#"
            <html><body>
              <div>
                <dt>Rating</dt>
                <dd>
                  <span class="tw-text-fg-secondary">5.0</span>
                  <a aria-label="1 Review">reviews</a>
                </dd>
              </div>
            </body></html>
        "#;
        let record = extract_record(html);
        assert_eq!(record.total_reviews.as_deref(), Some("1"));
    }

    #[test]
    fn test_missing_heading_is_unknown() {
        let record = extract_record("<html><body><p>nothing here</p></body></html>");
        assert_eq!(record.app_name, "Unknown");
    }

    #[test]
    fn test_empty_document() {
        let record = extract_record("");
        assert_eq!(record.app_name, "Unknown");
        assert_eq!(record.launch_date, None);
        assert_eq!(record.rating, None);
        assert_eq!(record.total_reviews, None);
    }
}

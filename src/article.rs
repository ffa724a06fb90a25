use crate::error::{JudgeError, Result};
use scraper::{ElementRef, Html, Selector};
use serde::{Deserialize, Serialize};
use std::io::Read;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

const ARTICLE_EXTENSIONS: [&str; 5] = ["txt", "md", "json", "html", "htm"];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Article {
    pub url: Option<String>,
    pub title: Option<String>,
    pub author: Option<String>,
    pub thumbnail: Option<String>,
    pub text: String,
}

impl Article {
    /// Plain text with optional `Title:`, `Author:`, `Thumbnail:` and `URL:` lines.
    pub fn from_plain_text(content: &str) -> Self {
        let mut article = Article::default();
        let mut lines = content.lines().peekable();

        while let Some(line) = lines.peek() {
            let Some((key, value)) = line.split_once(':') else {
                break;
            };
            let value = non_empty(value);
            match key.trim().to_ascii_lowercase().as_str() {
                "title" => article.title = value,
                "author" => article.author = value,
                "thumbnail" => article.thumbnail = value,
                "url" => article.url = value,
                _ => break,
            }
            lines.next();
        }

        let remaining = lines.collect::<Vec<_>>();
        let mut body = remaining.as_slice();
        while let Some((first, rest)) = body.split_first() {
            if first.trim().is_empty() {
                body = rest;
                continue;
            }
            if article.title.is_none() {
                if let Some(heading) = first.trim().strip_prefix("# ") {
                    article.title = non_empty(heading);
                    body = rest;
                    continue;
                }
            }
            break;
        }
        article.text = body.join("\n").trim().to_string();
        article
    }

    pub fn from_json(content: &str) -> Result<Self> {
        serde_json::from_str(content)
            .map_err(|err| JudgeError::ArticleUnavailable(format!("malformed article JSON: {err}")))
    }

    pub fn from_html(content: &str) -> Self {
        let page = Html::parse_document(content);
        let title = meta_content(&page, &["meta[property='og:title']", "meta[name='og:title']"])
            .or_else(|| select_first(&page, "title").and_then(|title| non_empty(&element_text(title))));
        let author = meta_content(&page, &["meta[name='byl']"])
            .map(strip_byline)
            .or_else(|| {
                meta_content(
                    &page,
                    &["meta[name='author']", "meta[property='article:author']"],
                )
            })
            .or_else(|| {
                select_first(&page, "a[rel~='author']").and_then(|link| non_empty(&element_text(link)))
            });
        let thumbnail = meta_content(
            &page,
            &[
                "meta[property='og:image']",
                "meta[name='og:image']",
                "meta[property='twitter:image']",
                "meta[name='twitter:image']",
            ],
        );
        let url = select_first(&page, "link[rel='canonical']")
            .and_then(|link| link.value().attr("href"))
            .and_then(non_empty)
            .or_else(|| meta_content(&page, &["meta[property='og:url']"]));

        Article {
            url,
            title,
            author,
            thumbnail,
            text: main_text(&page),
        }
    }

    pub fn identity(&self) -> String {
        match self.url.as_deref().map(str::trim) {
            Some(url) if !url.is_empty() => format!("url:{url}"),
            _ => format!(
                "text:{}\n{}",
                self.title.as_deref().unwrap_or(""),
                self.text
            ),
        }
    }

    pub fn label(&self) -> String {
        self.title
            .clone()
            .or_else(|| self.url.clone())
            .unwrap_or_else(|| "untitled".to_string())
    }

    fn ensure_text(self, source: &str) -> Result<Self> {
        if self.text.trim().is_empty() {
            Err(JudgeError::ArticleUnavailable(format!(
                "{source}: no article text"
            )))
        } else {
            Ok(self)
        }
    }
}

fn non_empty(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

fn select_first<'a>(scope: &'a Html, css: &str) -> Option<ElementRef<'a>> {
    let selector = Selector::parse(css).ok()?;
    scope.select(&selector).next()
}

fn meta_content(page: &Html, selectors: &[&str]) -> Option<String> {
    selectors.iter().find_map(|css| {
        select_first(page, css)
            .and_then(|meta| meta.value().attr("content"))
            .and_then(non_empty)
    })
}

fn element_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn strip_byline(byline: String) -> String {
    match byline.get(..3) {
        Some(prefix) if prefix.eq_ignore_ascii_case("by ") => byline[3..].trim().to_string(),
        _ => byline,
    }
}

fn main_text(page: &Html) -> String {
    let Ok(blocks) = Selector::parse("p, h2, h3") else {
        return String::new();
    };
    let Some(container) = ["article", "main", "body"]
        .iter()
        .find_map(|css| select_first(page, css))
    else {
        return String::new();
    };
    container
        .select(&blocks)
        .map(element_text)
        .filter(|paragraph| !paragraph.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn has_extension(path: &Path, known: &[&str]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| known.iter().any(|known| ext.eq_ignore_ascii_case(known)))
        .unwrap_or(false)
}

pub fn load_article(path: &Path) -> Result<Article> {
    let content = std::fs::read_to_string(path).map_err(|err| {
        JudgeError::ArticleUnavailable(format!("cannot read {}: {err}", path.display()))
    })?;
    let article = if has_extension(path, &["json"]) {
        Article::from_json(&content)?
    } else if has_extension(path, &["html", "htm"]) {
        Article::from_html(&content)
    } else {
        Article::from_plain_text(&content)
    };
    article.ensure_text(&path.display().to_string())
}

pub fn read_article(mut reader: impl Read) -> Result<Article> {
    let mut content = String::new();
    reader
        .read_to_string(&mut content)
        .map_err(|err| JudgeError::ArticleUnavailable(format!("cannot read input: {err}")))?;
    let head = content.trim_start();
    let article = if head.starts_with('{') {
        Article::from_json(&content)?
    } else if head.starts_with('<') {
        Article::from_html(&content)
    } else {
        Article::from_plain_text(&content)
    };
    article.ensure_text("stdin")
}

pub fn discover_articles(root: &Path) -> Vec<PathBuf> {
    let mut paths = WalkDir::new(root)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| {
            !entry
                .path()
                .components()
                .any(|component| component.as_os_str() == ".judge")
        })
        .filter(|entry| has_extension(entry.path(), &ARTICLE_EXTENSIONS))
        .map(|entry| entry.path().to_path_buf())
        .collect::<Vec<_>>();
    paths.sort();
    paths
}

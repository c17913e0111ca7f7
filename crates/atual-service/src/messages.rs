//! Group message templates. The text is what lands in the WhatsApp/Telegram
//! groups, so it stays in Portuguese and uses their `*bold*` markup.

use crate::models::{JobPost, NewsPost};

const SUMMARY_PREVIEW_CHARS: usize = 200;

fn present(value: Option<&str>) -> Option<&str> {
    value.filter(|text| !text.is_empty())
}

fn link_for<'a>(tracking_url: Option<&'a str>, source_url: Option<&'a str>) -> &'a str {
    present(tracking_url)
        .or(present(source_url))
        .unwrap_or_default()
}

pub fn format_job_message(job: &JobPost) -> String {
    let mut message = format!(
        "💼 *NOVA VAGA DE EMPREGO*\n\n📋 *{}*\n🏢 {}\n📍 {}",
        job.title,
        present(job.company.as_deref()).unwrap_or("Empresa não informada"),
        present(job.location.as_deref()).unwrap_or("Localização não informada"),
    );

    if let Some(salary) = present(job.salary.as_deref()) {
        message.push_str(&format!("\n💰 {salary}"));
    }
    if let Some(work_mode) = present(job.work_mode.as_deref()) {
        message.push_str(&format!("\n🏠 {work_mode}"));
    }
    if let Some(job_type) = present(job.job_type.as_deref()) {
        message.push_str(&format!("\n📄 {job_type}"));
    }

    message.push_str(&format!(
        "\n\n👉 *Clique aqui para se candidatar:*\n{}",
        link_for(job.tracking_url.as_deref(), job.source_url.as_deref())
    ));

    message
}

pub fn format_news_message(news: &NewsPost) -> String {
    let mut message = format!("📰 *NOTÍCIA MUNDIAL*\n\n📋 *{}*", news.title);

    if let Some(summary) = present(news.summary.as_deref()) {
        let preview: String = summary.chars().take(SUMMARY_PREVIEW_CHARS).collect();
        let ellipsis = if summary.chars().count() > SUMMARY_PREVIEW_CHARS {
            "..."
        } else {
            ""
        };
        message.push_str(&format!("\n\n📝 {preview}{ellipsis}"));
    }
    if let Some(source_name) = present(news.source_name.as_deref()) {
        message.push_str(&format!("\n\n🏢 Fonte: {source_name}"));
    }

    message.push_str(&format!(
        "\n\n👉 *Leia mais:*\n{}",
        link_for(news.tracking_url.as_deref(), Some(&news.source_url))
    ));

    message
}

//! Prompt templates for the three generation steps, per locale.

use common::Locale;

/// Text returned in place of headlines when the news API has nothing for the topic.
pub fn no_news_placeholder(locale: Locale) -> &'static str {
    match locale {
        Locale::En => "No recent news found.",
        Locale::Ru => "Свежих новостей не найдено.",
    }
}

pub fn title_prompt(locale: Locale, topic: &str, digest: &str) -> String {
    match locale {
        Locale::En => format!(
            "Come up with an attractive headline strictly on the topic '{topic}', taking into account the news:\n{digest}"
        ),
        Locale::Ru => format!(
            "Придумайте привлекательный заголовок строго по теме '{topic}', с учётом новостей:\n{digest}"
        ),
    }
}

pub fn meta_description_prompt(locale: Locale, topic: &str, title: &str) -> String {
    match locale {
        Locale::En => format!(
            "Write a short and concise meta description for an article titled '{title}', strictly on the topic '{topic}'."
        ),
        Locale::Ru => format!(
            "Напишите краткое и ёмкое мета-описание для статьи с заголовком '{title}', строго по теме '{topic}'."
        ),
    }
}

pub fn body_prompt(locale: Locale, topic: &str, digest: &str) -> String {
    match locale {
        Locale::En => format!(
            r#"Write an article strictly on the topic: '{topic}', using the recent news:
{digest}

Requirements:
1. Maximum length is 4000 characters.
2. Structure: introduction, main part, conclusion.
3. Use subheadings and specifics.
4. Cut filler and introductory phrases.
5. The article must be logical and easy to read."#
        ),
        Locale::Ru => format!(
            r#"Напишите статью строго по теме: '{topic}', используя свежие новости:
{digest}

Требования:
1. Максимальная длина — 4000 символов.
2. Структура: вступление, основная часть, заключение.
3. Используйте подзаголовки и конкретику.
4. Убирайте "воду" и вводные фразы.
5. Статья должна быть логичной и легко читаемой."#
        ),
    }
}

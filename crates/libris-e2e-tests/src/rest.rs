use anyhow::Result;
use reqwest::Url;
use serde_json::{Value, json};
use tracing::info;

pub fn book_json(title: &str, author: &str, isbn: &str, year: i32) -> Value {
    json!({
        "title": title,
        "author": author,
        "genre": "Science Fiction",
        "year_published": year,
        "isbn": isbn,
    })
}

pub async fn create_book(client: &reqwest::Client, base_url: &Url, payload: &Value) -> Result<Value> {
    let api_url = base_url.join("api/book")?;

    let response = client.post(api_url).json(payload).send().await?;
    info!("Response: {:#?}", response);
    assert!(response.status().is_success());
    assert_eq!(response.status().as_u16(), 201);

    let new_book: Value = response.json().await?;
    Ok(new_book)
}

//! Subcommand implementations.

pub mod auth;
pub mod config;
pub mod create;
pub mod list;

use std::io::Write;

use gcal_events_providers::google::GoogleCalendarClient;

use crate::config::ClientConfig;
use crate::error::ClientResult;

/// Lists upcoming events, then creates the configured batch.
///
/// Both steps share one authorized session.
pub async fn list_then_create<W: Write>(
    config: &ClientConfig,
    out: &mut W,
) -> ClientResult<()> {
    let (google, session) = auth::session(config).await?;
    let client = GoogleCalendarClient::new(&session, &google)?;

    let schedule = config.schedule(None, None, None)?;
    let events = schedule.build_events(&config.event_template())?;

    list::print_upcoming(&client, &config.list_query(None, None), out).await?;
    create::insert_all(&client, &config.create.calendar_id, &events, out).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use gcal_events_providers::google::{Token, TokenCache};
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn failed_listing_still_creates_every_event() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/token"))
            .respond_with(ResponseTemplate::new(500))
            .expect(0)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/calendars/primary/events"))
            .respond_with(ResponseTemplate::new(500).set_body_json(serde_json::json!({
                "error": {"code": 500, "message": "Backend Error"}
            })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/calendars/primary/events"))
            .and(header("authorization", "Bearer AT1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "htmlLink": "https://calendar.example/event"
            })))
            .expect(6)
            .mount(&server)
            .await;

        let tmp = tempfile::tempdir().unwrap();
        let credentials_path = tmp.path().join("client_secret.json");
        std::fs::write(
            &credentials_path,
            r#"{"installed":{"client_id":"abc","client_secret":"xyz","redirect_uris":["urn:ietf:wg:oauth:2.0:oob"]}}"#,
        )
        .unwrap();
        let mut config = ClientConfig {
            credentials_path,
            token_path: tmp.path().join("token.json"),
            ..ClientConfig::default()
        };
        config.google.token_url = Some(format!("{}/token", server.uri()));
        config.google.api_base_url = Some(server.uri());
        TokenCache::new(&config.token_path)
            .write(&Token::new("AT1").with_refresh_token("RT1").expiring_in(3600))
            .unwrap();

        let mut out = Vec::new();
        list_then_create(&config, &mut out).await.unwrap();

        let output = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 7, "{output}");
        assert!(lines[0].starts_with("The API returned an error: "));
        for line in &lines[1..] {
            assert!(line.starts_with("Event created for "), "{line}");
            assert!(line.ends_with("https://calendar.example/event"));
        }

        // One cached session serves the listing first, then every insert
        let requests = server.received_requests().await.unwrap();
        assert_eq!(requests.len(), 7);
        assert_eq!(requests[0].method.as_str(), "GET");
        for request in &requests {
            assert_eq!(request.headers.get("authorization").unwrap(), "Bearer AT1");
        }
        assert!(requests[1..].iter().all(|r| r.method.as_str() == "POST"));
    }
}

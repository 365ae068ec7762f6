//! Listing upcoming events.

use std::io::Write;

use tracing::warn;

use gcal_events_providers::google::{GoogleCalendarClient, ListEventsQuery};

use crate::config::ClientConfig;
use crate::error::ClientResult;

/// Authorizes and prints upcoming events to stdout.
pub async fn run(
    config: &ClientConfig,
    max_results: Option<u32>,
    calendar: Option<String>,
) -> ClientResult<()> {
    let (google, session) = super::auth::session(config).await?;
    let client = GoogleCalendarClient::new(&session, &google)?;
    let query = config.list_query(max_results, calendar);

    print_upcoming(&client, &query, &mut std::io::stdout()).await
}

/// Prints one `<start> - <summary>` line per upcoming event.
///
/// An API failure is reported on `out` and does not fail the command.
pub async fn print_upcoming<W: Write>(
    client: &GoogleCalendarClient,
    query: &ListEventsQuery,
    out: &mut W,
) -> ClientResult<()> {
    let events = match client.list_events(query).await {
        Ok(events) => events,
        Err(e) => {
            warn!("listing events failed: {}", e);
            writeln!(out, "The API returned an error: {}", e)?;
            return Ok(());
        }
    };

    if events.is_empty() {
        writeln!(out, "No upcoming events found.")?;
        return Ok(());
    }

    writeln!(out, "Upcoming {} events:", query.max_results)?;
    for event in &events {
        writeln!(out, "{} - {}", event.start_display(), event.summary_display())?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use gcal_events_providers::google::{
        AuthorizedSession, ClientCredentials, GoogleConfig, Token, TokenOrigin,
    };
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> GoogleCalendarClient {
        let credentials = ClientCredentials::new("abc", "xyz", "urn:ietf:wg:oauth:2.0:oob");
        let session =
            AuthorizedSession::new(credentials.clone(), Token::new("AT1"), TokenOrigin::Cached);
        let config = GoogleConfig::new(credentials).with_api_base_url(server.uri());
        GoogleCalendarClient::new(&session, &config).unwrap()
    }

    async fn output_for(server: &MockServer) -> String {
        let mut out = Vec::new();
        print_upcoming(&client_for(server), &ListEventsQuery::upcoming(10), &mut out)
            .await
            .unwrap();
        String::from_utf8(out).unwrap()
    }

    #[tokio::test]
    async fn prints_events() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/calendars/primary/events"))
            .and(query_param("maxResults", "10"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "items": [
                    {"summary": "Standup", "start": {"dateTime": "2024-01-15T10:00:00-06:00"}},
                    {"summary": "Company holiday", "start": {"date": "2024-01-16"}}
                ]
            })))
            .mount(&server)
            .await;

        assert_eq!(
            output_for(&server).await,
            "Upcoming 10 events:\n\
             2024-01-15T10:00:00-06:00 - Standup\n\
             2024-01-16 - Company holiday\n"
        );
    }

    #[tokio::test]
    async fn empty_list_prints_single_line() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"items": []})))
            .mount(&server)
            .await;

        assert_eq!(output_for(&server).await, "No upcoming events found.\n");
    }

    #[tokio::test]
    async fn api_error_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500).set_body_string("backend error"))
            .mount(&server)
            .await;

        let output = output_for(&server).await;
        assert!(output.starts_with("The API returned an error: "));
        assert!(output.contains("backend error"));
        assert_eq!(output.lines().count(), 1);
    }
}

use std::{sync::Arc, time::Duration};

use axum::{Router, http::StatusCode, routing::get};
use tokio::net::TcpListener;

use rmc_api::{
	ApiBase, ApiClient, CharacterEnvelope, Episode, FetchError, HttpTransport, Request,
	ResourceKind,
};

const CHARACTER_PAGE: &str = r#"{
	"info": { "count": 1, "pages": 1, "next": null, "prev": null },
	"results": [{
		"id": 1,
		"name": "Rick Sanchez",
		"status": "Alive",
		"species": "Human",
		"type": "",
		"gender": "Male",
		"origin": { "name": "Earth (C-137)", "url": "" },
		"location": { "name": "Citadel of Ricks", "url": "" },
		"image": "",
		"episode": [],
		"url": "",
		"created": "2017-11-04T18:48:46.250Z"
	}]
}"#;

async fn serve() -> ApiBase {
	let router = Router::new()
		.route("/api/character", get(|| async { CHARACTER_PAGE }))
		.route("/api/episode", get(|| async { "<html>not json</html>" }))
		.route("/api/location", get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }))
		.route("/api/episode/1", get(|| async { (StatusCode::OK, "   ") }));
	let listener = TcpListener::bind("127.0.0.1:0").await.expect("Failed to bind test listener.");
	let addr = listener.local_addr().expect("Failed to read listener address.");

	tokio::spawn(async move {
		axum::serve(listener, router).await.expect("Test server failed.");
	});

	ApiBase::parse(&format!("http://{addr}/api")).expect("Failed to parse test base.")
}

fn client() -> ApiClient {
	let transport =
		HttpTransport::new(Duration::from_secs(5), "rmc-test").expect("Failed to build transport.");

	ApiClient::new(Arc::new(transport))
}

#[tokio::test]
async fn decodes_successful_page() {
	let base = serve().await;
	let envelope: CharacterEnvelope = client()
		.execute(&base.list(ResourceKind::Character))
		.await
		.expect("Expected a decoded page.");

	assert_eq!(envelope.results.len(), 1);
	assert_eq!(envelope.results[0].name, "Rick Sanchez");
	assert!(envelope.info.next.is_none());
}

#[tokio::test]
async fn server_error_is_invalid_response() {
	let base = serve().await;
	let err = client()
		.execute::<CharacterEnvelope>(&base.list(ResourceKind::Location))
		.await
		.expect_err("Expected invalid response.");

	assert!(matches!(err, FetchError::InvalidResponse { status: Some(500), .. }), "{err:?}");
}

#[tokio::test]
async fn unknown_route_is_invalid_response() {
	let base = serve().await;
	let err = client()
		.execute::<Episode>(&base.item(ResourceKind::Episode, 99))
		.await
		.expect_err("Expected invalid response.");

	assert!(matches!(err, FetchError::InvalidResponse { status: Some(404), .. }), "{err:?}");
}

#[tokio::test]
async fn blank_body_is_invalid_response() {
	let base = serve().await;
	let err = client()
		.execute::<Episode>(&base.item(ResourceKind::Episode, 1))
		.await
		.expect_err("Expected invalid response.");

	assert!(matches!(err, FetchError::InvalidResponse { status: Some(200), .. }), "{err:?}");
}

#[tokio::test]
async fn malformed_body_is_decoding_failure() {
	let base = serve().await;
	let err = client()
		.execute::<CharacterEnvelope>(&base.list(ResourceKind::Episode))
		.await
		.expect_err("Expected decoding failure.");

	assert!(matches!(err, FetchError::DecodingFailed { .. }), "{err:?}");
}

#[tokio::test]
async fn refused_connection_is_transport_failure() {
	let base = ApiBase::parse("http://127.0.0.1:1/api").expect("Failed to parse base.");
	let request = Request::build(&base, ResourceKind::Character, Some("1"), Vec::new())
		.expect("Failed to build request.");
	let err = client().execute::<CharacterEnvelope>(&request).await.expect_err("Expected failure.");

	assert!(matches!(err, FetchError::Transport { .. }), "{err:?}");
}

//! Full item lifecycle against the live mock server.
//!
//! # Design
//! Starts the mock server on a random port, then exercises the services over
//! real HTTP through a ureq-backed transport. Validates that path building,
//! payload serialization, and response parsing work end-to-end, including
//! the typed field accessors on data that went through the wire.

use podio_core::{
    FieldPayload, FieldType, FilterOptions, HttpMethod, HttpRequest, HttpResponse, ItemCreate,
    ItemField, ItemService, ItemUpdate, PodioError, RefType, TagService, Transport,
};
use serde_json::json;

/// Executes requests with ureq against a fixed base URL.
///
/// Disables ureq's automatic status-code-as-error behavior so 4xx/5xx
/// responses come back as data, letting the client handle status
/// interpretation.
struct UreqTransport {
    agent: ureq::Agent,
    base_url: String,
}

impl UreqTransport {
    fn new(base_url: &str) -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .new_agent();
        Self {
            agent,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

impl Transport for UreqTransport {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, PodioError> {
        let url = format!("{}{}", self.base_url, request.path);
        let mut response = match (request.method, request.body) {
            (HttpMethod::Get, _) => self.agent.get(&url).call(),
            (HttpMethod::Delete, _) => self.agent.delete(&url).call(),
            (HttpMethod::Post, Some(body)) => self
                .agent
                .post(&url)
                .content_type("application/json")
                .send(body.as_bytes()),
            (HttpMethod::Post, None) => self.agent.post(&url).send_empty(),
            (HttpMethod::Put, Some(body)) => self
                .agent
                .put(&url)
                .content_type("application/json")
                .send(body.as_bytes()),
            (HttpMethod::Put, None) => self.agent.put(&url).send_empty(),
        }
        .map_err(|e| PodioError::Transport(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response.body_mut().read_to_string().unwrap_or_default();
        Ok(HttpResponse {
            status,
            headers: Vec::new(),
            body,
        })
    }
}

fn start_server() -> String {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run(listener).await
        })
        .unwrap();
    });

    format!("http://{addr}")
}

#[test]
fn item_lifecycle() {
    let transport = UreqTransport::new(&start_server());
    let items = ItemService::new(&transport);
    let tags = TagService::new(&transport);
    let app_id = 7;

    // Step 1: create an item through the typed field setters.
    let mut title = ItemField::new(FieldType::Text, "title");
    title.set_text("Quarterly report").unwrap();
    let mut attachments = ItemField::new(FieldType::Image, "attachments");
    attachments.set_file_ids([11, 12, 13]).unwrap();

    let create = ItemCreate {
        external_id: Some("report-q3".to_string()),
        fields: vec![(&title).into(), (&attachments).into()],
        ..Default::default()
    };
    let created = items.create(app_id, &create).unwrap();
    assert_eq!(created.title.as_deref(), Some("Quarterly report"));

    // Step 2: read it back and project the typed values.
    let item = items.get(created.item_id).unwrap();
    assert_eq!(item.external_id.as_deref(), Some("report-q3"));
    assert_eq!(item.revision, 0);
    assert_eq!(
        item.field("title").unwrap().texts().unwrap(),
        vec!["Quarterly report"]
    );
    assert_eq!(
        item.field("attachments").unwrap().file_ids().unwrap(),
        vec![11, 12, 13]
    );

    // Step 3: a changing update yields a new revision.
    let update = ItemUpdate {
        fields: vec![FieldPayload::by_external_id(
            "title",
            vec![json!({ "value": "Quarterly report, final" })],
        )],
        ..Default::default()
    };
    let revision = items.update(created.item_id, &update).unwrap();
    assert_eq!(revision.map(|r| r.revision), Some(1));

    // Step 4: the identical update changes nothing and yields no revision.
    let revision = items.update(created.item_id, &update).unwrap();
    assert!(revision.is_none());

    // Step 5: update a single field through the value endpoint.
    let fields = [FieldPayload::by_external_id(
        "attachments",
        vec![json!({ "value": 14 })],
    )];
    let revision = items.update_values(created.item_id, &fields).unwrap();
    assert_eq!(revision.map(|r| r.revision), Some(2));
    let item = items.get(created.item_id).unwrap();
    assert_eq!(
        item.field("attachments").unwrap().file_ids().unwrap(),
        vec![14]
    );

    // Step 6: filter sees the item.
    let collection = items
        .filter(
            app_id,
            &FilterOptions {
                limit: Some(10),
                ..Default::default()
            },
        )
        .unwrap();
    assert_eq!(collection.total, 1);
    assert_eq!(collection.filtered, 1);
    assert_eq!(collection.items[0].item_id, created.item_id);

    // Step 7: tags aggregate with query parameters applied.
    tags.create(RefType::Item, created.item_id, &["urgent", "finance"])
        .unwrap();
    let counts = tags.on_app(app_id, None, None).unwrap();
    assert_eq!(counts.len(), 2);
    let filtered = tags.on_app(app_id, Some(5), Some("ur")).unwrap();
    assert_eq!(filtered.len(), 1);
    assert_eq!(filtered[0].text, "urgent");
    assert_eq!(filtered[0].count, 1);

    // Step 8: delete, then every lookup is NotFound.
    items.delete(created.item_id, true).unwrap();
    assert!(matches!(
        items.get(created.item_id).unwrap_err(),
        PodioError::NotFound
    ));
    assert!(matches!(
        items.delete(created.item_id, false).unwrap_err(),
        PodioError::NotFound
    ));

    // Step 9: the app has no items left.
    let collection = items.filter(app_id, &FilterOptions::default()).unwrap();
    assert_eq!(collection.total, 0);
    assert!(collection.items.is_empty());
}

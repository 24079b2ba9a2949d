//! Full task lifecycle against the live mock upstream.
//!
//! # Design
//! Starts the mock server on a random port, then exercises every client
//! operation over real HTTP using ureq. Validates that request building,
//! correlation headers and response parsing work end-to-end with the actual
//! server, and catches schema drift between the two crates' DTOs.

use mock_server::MockState;
use task_gateway_core::{
    ApiError, HttpMethod, HttpRequest, HttpResponse, RequestContext, TaskRequest, TaskTrackerClient,
};

/// Execute an `HttpRequest` using ureq and return an `HttpResponse`.
///
/// Disables ureq's automatic status-code-as-error behavior so 4xx/5xx
/// responses are returned as data rather than `Err`, letting the core
/// client handle status interpretation.
fn execute(req: HttpRequest) -> HttpResponse {
    let agent = ureq::Agent::config_builder()
        .http_status_as_error(false)
        .build()
        .new_agent();

    let mut response = match req.method {
        HttpMethod::Get => {
            let mut call = agent.get(&req.path);
            for (name, value) in &req.headers {
                call = call.header(name, value);
            }
            call.call()
        }
        HttpMethod::Delete => {
            let mut call = agent.delete(&req.path);
            for (name, value) in &req.headers {
                call = call.header(name, value);
            }
            call.call()
        }
        HttpMethod::Post => {
            let mut call = agent.post(&req.path);
            for (name, value) in &req.headers {
                call = call.header(name, value);
            }
            match req.body {
                Some(body) => call.send(body.as_bytes()),
                None => call.send_empty(),
            }
        }
    }
    .expect("HTTP transport error");

    let status = response.status().as_u16();
    let body = response.body_mut().read_to_string().unwrap_or_default();

    HttpResponse {
        status,
        headers: Vec::new(),
        body,
    }
}

fn start_mock(state: MockState) -> std::net::SocketAddr {
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
            mock_server::run_with_state(listener, state).await
        })
        .unwrap();
    });

    addr
}

#[test]
fn task_lifecycle() {
    let state = MockState::default();
    let addr = start_mock(state.clone());
    let client = TaskTrackerClient::new(&format!("http://{addr}"));
    let ctx = RequestContext::detached("lifecycle-1");

    // List: should be empty.
    let tasks = client.parse_list_tasks(execute(client.build_list_tasks(&ctx))).unwrap();
    assert!(tasks.is_empty(), "expected empty list");

    // Create.
    let input = TaskRequest {
        title: "Integration test".to_string(),
        description: "Created over real HTTP".to_string(),
        status: "In Progress".to_string(),
        due_date: Some("2031-05-01T08:30:00Z".parse().unwrap()),
    };
    let req = client.build_create_task(&ctx, &input).unwrap();
    let created = client.parse_create_task(execute(req)).unwrap();
    assert_eq!(created.task, input);
    let id = created.id.clone().expect("upstream assigns an id").to_string();

    // Get.
    let fetched = client.parse_get_task(execute(client.build_get_task(&ctx, &id))).unwrap();
    assert_eq!(fetched, created);

    // List: one item.
    let tasks = client.parse_list_tasks(execute(client.build_list_tasks(&ctx))).unwrap();
    assert_eq!(tasks.len(), 1);

    // Delete, then get and delete again: NotFound.
    client
        .parse_delete_task(execute(client.build_delete_task(&ctx, &id)))
        .unwrap();
    let err = client
        .parse_get_task(execute(client.build_get_task(&ctx, &id)))
        .unwrap_err();
    assert!(matches!(err, ApiError::NotFound));
    let err = client
        .parse_delete_task(execute(client.build_delete_task(&ctx, &id)))
        .unwrap_err();
    assert!(matches!(err, ApiError::NotFound));

    // Every request carried the context's correlation id.
    let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();
    let seen = rt.block_on(state.seen_correlation_ids());
    assert_eq!(seen.len(), 7);
    assert!(seen.iter().all(|id| id == "lifecycle-1"));
}

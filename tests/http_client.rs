//! Wire-level checks of the reqwest transport against a loopback stub
//! that answers each connection with one canned response.
#![cfg(feature = "no-wasm")]

use course_desk::error::ErrorKind;
use course_desk::interface::RequestApi;
use course_desk::model::dtos::{CourseClaim, LoginParams};
use course_desk::ReqwestClient;
use reqwest::Client;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;

struct Stub {
    base_url: String,
    seen: mpsc::UnboundedReceiver<String>,
}

impl Stub {
    fn client(&self) -> ReqwestClient {
        ReqwestClient::with_client(loopback_client(), &self.base_url)
    }

    /// Raw request text, lowercased.
    async fn next_request(&mut self) -> String {
        self.seen.recv().await.expect("stub saw a request").to_lowercase()
    }
}

fn loopback_client() -> Client {
    Client::builder().no_proxy().build().unwrap()
}

async fn serve(responses: Vec<(u16, &'static str)>) -> Stub {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, seen) = mpsc::unbounded_channel();

    tokio::spawn(async move {
        for (status, body) in responses {
            let (mut stream, _) = listener.accept().await.unwrap();
            let request = read_request(&mut stream).await;
            let _ = tx.send(request);

            let reply = format!(
                "HTTP/1.1 {status} {}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                reason(status),
                body.len()
            );
            stream.write_all(reply.as_bytes()).await.unwrap();
            stream.shutdown().await.unwrap();
        }
    });

    Stub {
        base_url: format!("http://{addr}/api"),
        seen,
    }
}

async fn read_request(stream: &mut TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    loop {
        let n = stream.read(&mut chunk).await.unwrap();
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);

        let text = String::from_utf8_lossy(&buf);
        if let Some(end) = text.find("\r\n\r\n") {
            let length = text[..end]
                .lines()
                .find_map(|line| {
                    let (name, value) = line.split_once(':')?;
                    name.eq_ignore_ascii_case("content-length")
                        .then(|| value.trim().parse::<usize>().ok())
                        .flatten()
                })
                .unwrap_or(0);
            if buf.len() >= end + 4 + length {
                break;
            }
        }
    }
    String::from_utf8_lossy(&buf).into_owned()
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        201 => "Created",
        401 => "Unauthorized",
        403 => "Forbidden",
        _ => "Internal Server Error",
    }
}

#[tokio::test]
async fn sends_bearer_token_and_reads_courses() {
    let mut stub = serve(vec![(200, r#"{"courses":["CS101","MATH200"]}"#)]).await;

    let courses = stub
        .client()
        .get_student_courses("tok-123", "bob smith")
        .await
        .unwrap();

    assert_eq!(courses, ["CS101", "MATH200"]);
    let request = stub.next_request().await;
    assert!(request.starts_with("get /api/students/bob%20smith/courses http/1.1"));
    assert!(request.contains("authorization: bearer tok-123"));
}

#[tokio::test]
async fn null_lists_are_empty() {
    let mut stub = serve(vec![
        (200, "null"),
        (200, r#"{"courses":null}"#),
        (200, "[]"),
    ])
    .await;
    let client = stub.client();

    assert!(client.get_course_requests("tok").await.unwrap().is_empty());
    assert!(client.get_student_courses("tok", "bob").await.unwrap().is_empty());
    assert!(client.get_courses("tok").await.unwrap().is_empty());

    assert!(stub.next_request().await.starts_with("get /api/requests "));
    assert!(stub.next_request().await.starts_with("get /api/students/bob/courses "));
    assert!(stub.next_request().await.starts_with("get /api/courses "));
}

#[tokio::test]
async fn login_posts_credentials() {
    let mut stub = serve(vec![(200, r#"{"token":"header.payload.sig"}"#)]).await;

    let token = stub
        .client()
        .login(LoginParams {
            username: "bob",
            password: "hunter2",
        })
        .await
        .unwrap();

    assert_eq!(token, "header.payload.sig");
    let request = stub.next_request().await;
    assert!(request.starts_with("post /api/login "));
    assert!(request.contains(r#"{"username":"bob","password":"hunter2"}"#));
    assert!(!request.contains("authorization:"));
}

#[tokio::test]
async fn drop_course_sends_claim_in_delete_body() {
    let mut stub = serve(vec![(200, r#"{"message":"Course removed"}"#)]).await;

    let ack = stub
        .client()
        .drop_student_course(
            "tok",
            CourseClaim {
                username: "bob",
                course: "CS101",
            },
        )
        .await
        .unwrap();

    assert_eq!(ack.message, "Course removed");
    let request = stub.next_request().await;
    assert!(request.starts_with("delete /api/students/bob/courses/cs101 "));
    assert!(request.contains(r#"{"username":"bob","course":"cs101"}"#));
}

#[tokio::test]
async fn status_codes_map_to_error_kinds() {
    let stub = serve(vec![
        (401, r#"{"error":"Invalid token"}"#),
        (403, r#"{"error":"Admins only"}"#),
        (500, r#"{"error":"Database unavailable"}"#),
        (201, r#"{"message":"Created"}"#),
    ])
    .await;
    let client = stub.client();

    let err = client.get_courses("tok").await.unwrap_err();
    assert!(err.is_unauthenticated());
    assert!(err.to_string().contains("Invalid token"));

    let err = client.get_students("tok").await.unwrap_err();
    assert!(matches!(err.kind(), ErrorKind::Forbidden(m) if m == "Admins only"));

    let err = client.get_course_requests("tok").await.unwrap_err();
    assert!(err.is_transient());
    assert!(matches!(
        err.kind(),
        ErrorKind::ApiError { status: 500, message } if message == "Database unavailable"
    ));

    // only 200 counts as success
    let err = client.delete_course("tok", "CS101").await.unwrap_err();
    assert!(matches!(err.kind(), ErrorKind::ApiError { status: 201, .. }));
}

#[tokio::test]
async fn empty_token_is_rejected_before_sending() {
    let mut stub = serve(vec![]).await;
    let client = stub.client();

    let err = client.get_courses("").await.unwrap_err();
    assert!(err.is_unauthenticated());
    let err = client.get_student_courses("  ", "bob").await.unwrap_err();
    assert!(err.is_unauthenticated());

    assert!(stub.seen.try_recv().is_err());
}

#[tokio::test]
async fn unreachable_server_is_transient() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = ReqwestClient::with_client(loopback_client(), &format!("http://{addr}/api"));
    let err = client.get_courses("tok").await.unwrap_err();

    assert!(err.is_transient());
    assert!(matches!(err.kind(), ErrorKind::ReqwestError(_)));
}

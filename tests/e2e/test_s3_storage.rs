use aws_sdk_s3::config::{BehaviorVersion, Credentials, Region};
use axum::{
    body::Bytes,
    extract::{Query, State},
    http::{header, HeaderMap, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    Router,
};
use parking_lot::Mutex;
use podcast_voice::infrastructure::storage::{
    ArtifactSink, DocumentSource, S3ArtifactSink, S3DocumentSource, StorageError,
};
use pretty_assertions::assert_eq;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tokio::net::TcpListener;

const BUCKET: &str = "podcast-test";
const PAGE_SIZE: usize = 2;

#[derive(Debug, Clone)]
struct PutRecord {
    key: String,
    content_type: Option<String>,
    body: Vec<u8>,
}

/// Path-style S3 stand-in holding a single bucket
#[derive(Default)]
struct FakeBucket {
    objects: Mutex<BTreeMap<String, Vec<u8>>>,
    list_calls: Mutex<Vec<Option<String>>>,
    puts: Mutex<Vec<PutRecord>>,
}

impl FakeBucket {
    fn with_objects(objects: &[(&str, &[u8])]) -> Self {
        let bucket = Self::default();
        for (key, body) in objects {
            bucket.objects.lock().insert(key.to_string(), body.to_vec());
        }
        bucket
    }
}

async fn handle(
    State(bucket): State<Arc<FakeBucket>>,
    method: Method,
    uri: Uri,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let path = uri.path().trim_start_matches('/');
    let (bucket_name, key) = path.split_once('/').unwrap_or((path, ""));
    if bucket_name != BUCKET {
        return (StatusCode::NOT_FOUND, "unknown bucket").into_response();
    }

    if method == Method::GET && key.is_empty() {
        return list_objects(&bucket, query.get("continuation-token").cloned());
    }

    if method == Method::GET {
        return match bucket.objects.lock().get(key) {
            Some(body) => (StatusCode::OK, body.clone()).into_response(),
            None => (StatusCode::NOT_FOUND, "no such key").into_response(),
        };
    }

    if method == Method::PUT {
        let content_type = headers
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let chunked = headers
            .get(header::CONTENT_ENCODING)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v.contains("aws-chunked"));
        let body = if chunked {
            decode_aws_chunked(&body)
        } else {
            body.to_vec()
        };

        bucket.objects.lock().insert(key.to_string(), body.clone());
        bucket.puts.lock().push(PutRecord {
            key: key.to_string(),
            content_type,
            body,
        });
        return StatusCode::OK.into_response();
    }

    StatusCode::METHOD_NOT_ALLOWED.into_response()
}

/// ListObjectsV2 with PAGE_SIZE keys per page; the token is the next index
fn list_objects(bucket: &FakeBucket, token: Option<String>) -> Response {
    bucket.list_calls.lock().push(token.clone());

    let keys: Vec<String> = bucket.objects.lock().keys().cloned().collect();
    let start = token
        .as_deref()
        .and_then(|t| t.strip_prefix("page-"))
        .and_then(|n| n.parse::<usize>().ok())
        .unwrap_or(0);
    let end = (start + PAGE_SIZE).min(keys.len());
    let truncated = end < keys.len();

    let mut xml = String::from(
        r#"<?xml version="1.0" encoding="UTF-8"?><ListBucketResult xmlns="http://s3.amazonaws.com/doc/2006-03-01/">"#,
    );
    xml.push_str(&format!("<Name>{}</Name><Prefix></Prefix>", BUCKET));
    xml.push_str(&format!("<KeyCount>{}</KeyCount><MaxKeys>{}</MaxKeys>", end - start, PAGE_SIZE));
    xml.push_str(&format!("<IsTruncated>{}</IsTruncated>", truncated));
    for key in &keys[start..end] {
        xml.push_str(&format!("<Contents><Key>{}</Key><Size>1</Size></Contents>", key));
    }
    if truncated {
        xml.push_str(&format!("<NextContinuationToken>page-{}</NextContinuationToken>", end));
    }
    xml.push_str("</ListBucketResult>");

    (StatusCode::OK, [(header::CONTENT_TYPE, "application/xml")], xml).into_response()
}

/// Strip aws-chunked framing (`<hex size>[;ext]\r\n<data>\r\n ... 0\r\n<trailers>`)
fn decode_aws_chunked(body: &[u8]) -> Vec<u8> {
    let mut decoded = Vec::new();
    let mut rest = body;
    while let Some(line_end) = rest.windows(2).position(|w| w == b"\r\n") {
        let line = String::from_utf8_lossy(&rest[..line_end]);
        let size_hex = line.split(';').next().unwrap_or("").trim();
        let size = usize::from_str_radix(size_hex, 16).unwrap_or(0);
        rest = &rest[line_end + 2..];
        if size == 0 {
            break;
        }
        decoded.extend_from_slice(&rest[..size]);
        rest = &rest[(size + 2).min(rest.len())..];
    }
    decoded
}

async fn spawn_bucket(bucket: FakeBucket) -> (Arc<aws_sdk_s3::Client>, Arc<FakeBucket>) {
    let bucket = Arc::new(bucket);
    let app = Router::new().fallback(handle).with_state(bucket.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let config = aws_sdk_s3::Config::builder()
        .behavior_version(BehaviorVersion::latest())
        .region(Region::new("us-east-1"))
        .credentials_provider(Credentials::new("test", "test", None, None, "e2e"))
        .endpoint_url(format!("http://{}", addr))
        .force_path_style(true)
        .build();

    (Arc::new(aws_sdk_s3::Client::from_conf(config)), bucket)
}

#[tokio::test]
async fn it_should_collect_every_page_of_scripts() {
    let (client, bucket) = spawn_bucket(FakeBucket::with_objects(&[
        ("a.txt", "one".as_bytes()),
        ("b.mp3", "audio".as_bytes()),
        ("c.txt", "two".as_bytes()),
        ("d.txt", "three".as_bytes()),
        ("e.md", "notes".as_bytes()),
    ]))
    .await;

    let source = S3DocumentSource::new(client, BUCKET);
    let names = source.list_documents().await.unwrap();

    assert_eq!(
        names,
        vec!["a.txt".to_string(), "c.txt".to_string(), "d.txt".to_string()]
    );
    assert_eq!(
        *bucket.list_calls.lock(),
        vec![None, Some("page-2".to_string()), Some("page-4".to_string())]
    );
}

#[tokio::test]
async fn it_should_read_script_objects_as_text() {
    let (client, _) = spawn_bucket(FakeBucket::with_objects(&[(
        "ep1.txt",
        "lang: es\n---\nHola".as_bytes(),
    )]))
    .await;

    let source = S3DocumentSource::new(client, BUCKET);
    let document = source.read_document("ep1.txt").await.unwrap();

    assert_eq!(document.name, "ep1.txt");
    assert_eq!(document.content, "lang: es\n---\nHola");
    assert_eq!(source.location("ep1.txt"), "s3://podcast-test/ep1.txt");
}

#[tokio::test]
async fn it_should_reject_non_utf8_objects() {
    let (client, _) =
        spawn_bucket(FakeBucket::with_objects(&[("bad.txt", &[0xffu8, 0xfe, 0x00][..])])).await;

    let source = S3DocumentSource::new(client, BUCKET);
    let err = source.read_document("bad.txt").await.unwrap_err();

    assert!(matches!(err, StorageError::InvalidUtf8(_)), "got {:?}", err);
}

#[tokio::test]
async fn it_should_store_audio_under_prefix() {
    let (client, bucket) = spawn_bucket(FakeBucket::default()).await;

    let sink = S3ArtifactSink::new(client, BUCKET).with_prefix("episodes/");
    let stored = sink.store("ep1_es.mp3", b"ID3-audio").await.unwrap();

    assert_eq!(stored.key, "episodes/ep1_es.mp3");
    assert_eq!(stored.location, "s3://podcast-test/episodes/ep1_es.mp3");

    let puts = bucket.puts.lock().clone();
    assert_eq!(puts.len(), 1);
    assert_eq!(puts[0].key, "episodes/ep1_es.mp3");
    assert_eq!(puts[0].content_type.as_deref(), Some("audio/mpeg"));
    assert_eq!(puts[0].body, b"ID3-audio".to_vec());
}

#[tokio::test]
async fn it_should_store_audio_at_bucket_root_without_prefix() {
    let (client, bucket) = spawn_bucket(FakeBucket::default()).await;

    let sink = S3ArtifactSink::new(client, BUCKET);
    let stored = sink.store("ep2.mp3", b"ID3").await.unwrap();

    assert_eq!(stored.location, "s3://podcast-test/ep2.mp3");
    assert!(bucket.objects.lock().contains_key("ep2.mp3"));
}

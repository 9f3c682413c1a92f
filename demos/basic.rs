//! Minimal jsonwire demo: a tiny user API served over hyper.
//!
//! Run with:
//!   RUST_LOG=jsonwire=debug,basic=info cargo run --example basic
//!
//! Try:
//!   curl http://localhost:3000/users/42
//!   curl -X POST http://localhost:3000/users \
//!        -H 'content-type: application/json' \
//!        -d '{"name":"alice"}'
//!   curl -X POST http://localhost:3000/users -d '{"name":'
//!   curl http://localhost:3000/broken

use std::collections::BTreeMap;
use std::convert::Infallible;
use std::net::SocketAddr;

use bytes::Bytes;
use http::{Method, StatusCode};
use http_body_util::Full;
use hyper::service::service_fn;
use hyper_util::rt::{TokioExecutor, TokioIo};
use hyper_util::server::conn::auto::Builder as ConnBuilder;
use jsonwire::{JsonIo, Request, Response};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Serialize)]
struct User {
    id: String,
    name: String,
}

#[derive(Default, Deserialize)]
struct NewUser {
    name: String,
}

#[derive(Serialize)]
struct ApiError {
    error: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let addr: SocketAddr = std::env::var("JSONWIRE_ADDR")
        .unwrap_or_else(|_| "127.0.0.1:3000".to_owned())
        .parse()?;
    let listener = TcpListener::bind(addr).await?;
    let json = JsonIo::default();

    info!(%addr, "listening");

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            biased;

            _ = &mut shutdown => {
                info!("shutdown signal received");
                break;
            }

            res = listener.accept() => {
                let (stream, peer) = match res {
                    Ok(v) => v,
                    Err(e) => {
                        error!("accept error: {e}");
                        continue;
                    }
                };

                let json = json.clone();
                tokio::spawn(async move {
                    let svc = service_fn(move |req| dispatch(json.clone(), req));
                    if let Err(e) = ConnBuilder::new(TokioExecutor::new())
                        .serve_connection(TokioIo::new(stream), svc)
                        .await
                    {
                        error!(%peer, "connection error: {e}");
                    }
                });
            }
        }
    }

    Ok(())
}

async fn dispatch(
    json: JsonIo,
    req: hyper::Request<hyper::body::Incoming>,
) -> Result<http::Response<Full<Bytes>>, Infallible> {
    let req = match Request::buffer(req).await {
        Ok(req) => req,
        Err(e) => {
            let mut res = Response::new();
            json.write_user_error(&mut res, &ApiError { error: e.to_string() });
            return Ok(res.into());
        }
    };

    let segments: Vec<&str> = req.path().trim_matches('/').split('/').collect();
    let res = match (req.method(), segments.as_slice()) {
        (&Method::GET, ["users", id]) => get_user(&json, id),
        (&Method::POST, ["users"]) => create_user(&json, &req),
        (&Method::GET, ["broken"]) => broken(&json),
        _ => json.respond(StatusCode::NOT_FOUND, &ApiError { error: "not found".into() }),
    };

    Ok(res.into())
}

// GET /users/{id}
fn get_user(json: &JsonIo, id: &str) -> Response {
    json.ok(&User { id: id.to_owned(), name: "alice".into() })
}

// POST /users → 201, or 400 with the decode error
fn create_user(json: &JsonIo, req: &Request) -> Response {
    let mut input = NewUser::default();
    let mut res = Response::new();
    match json.read_json(req.body(), &mut input) {
        Ok(()) => json.write_response(
            &mut res,
            StatusCode::CREATED,
            &User { id: "99".into(), name: input.name },
        ),
        Err(e) => json.write_user_error(&mut res, &ApiError { error: e.to_string() }),
    }
    res
}

// GET /broken → plain-text 500: JSON object keys must be strings
fn broken(json: &JsonIo) -> Response {
    json.ok(&BTreeMap::from([((1, 2), "pair")]))
}

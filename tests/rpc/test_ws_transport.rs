// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::Result;
use futures_util::{SinkExt, StreamExt};
use serde_json::json;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio_tungstenite::{accept_async, tungstenite::Message};
use truenas_snap::report::RecordingReporter;
use truenas_snap::rpc::{RpcClient, RpcError, RpcRequest, RpcResponse, TlsMode, WsTransport};
use truenas_snap::snapshot::{authenticate, prune, PruneOptions};

/// Accept one connection and answer requests, hanging up once `close_after` were served
async fn spawn_server(close_after: Option<usize>) -> Result<SocketAddr> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        let (stream, _) = match listener.accept().await {
            Ok(conn) => conn,
            Err(_) => return,
        };
        let mut ws = match accept_async(stream).await {
            Ok(ws) => ws,
            Err(_) => return,
        };

        let mut handled = 0;
        while let Some(Ok(msg)) = ws.next().await {
            let text = match msg {
                Message::Text(text) => text,
                Message::Close(_) => break,
                _ => continue,
            };
            if close_after == Some(handled) {
                let _ = ws.close(None).await;
                break;
            }
            let request: RpcRequest = match serde_json::from_str(&text) {
                Ok(r) => r,
                Err(_) => break,
            };

            // Noise the client must skip
            let _ = ws.send(Message::Ping(vec![1, 2, 3])).await;
            let _ = ws
                .send(Message::Text(r#"{"msg": "ping"}"#.to_string()))
                .await;
            // A binary frame that would fail id correlation if it were decoded
            let _ = ws
                .send(Message::Binary(br#"{"id": 999, "result": true}"#.to_vec()))
                .await;

            let reply = match request.method.as_str() {
                "auth.login_with_api_key" => RpcResponse::success(request.id, json!(true)),
                "pool.snapshot.query" => RpcResponse::success(
                    request.id,
                    json!([
                        {"id": "tank@backup-1", "name": "tank@backup-1",
                         "properties": {"creation": {"rawvalue": "100"}}},
                        {"id": "tank@backup-2", "name": "tank@backup-2",
                         "properties": {"creation": {"rawvalue": "200"}}}
                    ]),
                ),
                "pool.snapshot.delete" => RpcResponse::success(request.id, json!(true)),
                _ => RpcResponse::failure(request.id, json!("unknown method")),
            };
            let frame = match serde_json::to_string(&reply) {
                Ok(f) => f,
                Err(_) => break,
            };
            if ws.send(Message::Text(frame)).await.is_err() {
                break;
            }
            handled += 1;
        }
    });

    Ok(addr)
}

fn endpoint(addr: SocketAddr) -> String {
    format!("ws://{}/api/current", addr)
}

#[tokio::test]
async fn test_call_over_websocket() -> Result<()> {
    let addr = spawn_server(None).await?;
    let transport = WsTransport::connect(&endpoint(addr), TlsMode::Verify).await?;
    let mut client = RpcClient::new(transport).with_timeout(Some(Duration::from_secs(5)));

    authenticate(&mut client, "1-secret").await?;

    let response = client.call("system.info", vec![]).await?;
    assert_eq!(response.id, Some(2));
    assert_eq!(response.into_result(), Err(json!("unknown method")));

    client.into_transport().close().await;
    Ok(())
}

#[tokio::test]
async fn test_prune_over_websocket() -> Result<()> {
    let addr = spawn_server(None).await?;
    let transport = WsTransport::connect(&endpoint(addr), TlsMode::Verify).await?;
    let mut client = RpcClient::new(transport).with_timeout(Some(Duration::from_secs(5)));
    let mut reporter = RecordingReporter::new();

    let options = PruneOptions {
        keep: 1,
        prefix: "backup-".to_string(),
        dry_run: false,
    };
    let outcome = prune(&mut client, "tank", &options, &mut reporter).await?;

    assert_eq!(outcome.retained, vec!["backup-2"]);
    assert_eq!(outcome.deleted, vec!["backup-1"]);
    assert_eq!(client.next_id(), 3);
    Ok(())
}

#[tokio::test]
async fn test_server_hangup_is_transport_error() -> Result<()> {
    let addr = spawn_server(Some(1)).await?;
    let transport = WsTransport::connect(&endpoint(addr), TlsMode::Verify).await?;
    let mut client = RpcClient::new(transport).with_timeout(Some(Duration::from_secs(5)));

    authenticate(&mut client, "1-secret").await?;
    let err = client
        .call("pool.snapshot.query", vec![])
        .await
        .unwrap_err();
    assert!(
        matches!(err, RpcError::Closed | RpcError::Receive(_)),
        "unexpected error: {:?}",
        err
    );
    Ok(())
}

#[tokio::test]
async fn test_unreachable_endpoint() -> Result<()> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    drop(listener);

    let err = match WsTransport::connect(&endpoint(addr), TlsMode::Verify).await {
        Ok(_) => panic!("connect should fail with nothing listening"),
        Err(e) => e,
    };
    assert!(matches!(err, RpcError::Connect { .. }));
    Ok(())
}

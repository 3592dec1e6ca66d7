use serde_json::{json, Value};
use std::error::Error;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;

// Very minimal, naive LSP client for manual testing against vue-fast-script-tcp.
// Usage: vue-fast-script-client [selected word]

const SAMPLE_URI: &str = "file:///tmp/Counter.vue";
const SAMPLE_COMPONENT: &str = r#"<template>
  <button @click="increment">{{ count }}</button>
</template>

<script setup lang="ts">
import { ref } from 'vue'
</script>
"#;

async fn send<W: AsyncWrite + Unpin>(writer: &mut W, message: Value) -> Result<(), Box<dyn Error>> {
    let body = message.to_string();
    let wire = format!("Content-Length: {}\r\n\r\n{}", body.len(), body);
    writer.write_all(wire.as_bytes()).await?;
    Ok(())
}

/// Read one `Content-Length` framed message.
async fn read_message<R: AsyncRead + Unpin>(reader: &mut BufReader<R>) -> Result<Value, Box<dyn Error>> {
    let mut length = None;
    loop {
        let mut header = String::new();
        if reader.read_line(&mut header).await? == 0 {
            return Err("server closed the connection".into());
        }
        let header = header.trim_end();
        if header.is_empty() {
            break;
        }
        if let Some(value) = header.strip_prefix("Content-Length:") {
            length = Some(value.trim().parse::<usize>()?);
        }
    }

    let length = length.ok_or("missing Content-Length header")?;
    let mut body = vec![0u8; length];
    reader.read_exact(&mut body).await?;
    Ok(serde_json::from_slice(&body)?)
}

/// Print incoming messages until the response with `id` arrives, answering
/// `workspace/applyEdit` requests on the way.
async fn wait_for_response<R, W>(
    reader: &mut BufReader<R>,
    writer: &mut W,
    id: u64,
) -> Result<Value, Box<dyn Error>>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    loop {
        let message = read_message(reader).await?;
        println!("<- {message}");

        if message.get("method").and_then(Value::as_str) == Some("workspace/applyEdit") {
            let request_id = message.get("id").cloned().unwrap_or(Value::Null);
            send(
                writer,
                json!({ "jsonrpc": "2.0", "id": request_id, "result": { "applied": true } }),
            )
            .await?;
            continue;
        }

        let is_response = message.get("method").is_none();
        if is_response && message.get("id").and_then(Value::as_u64) == Some(id) {
            return Ok(message);
        }
    }
}

/// Range of the first occurrence of `word` in the sample component.
fn word_range(word: &str) -> Option<Value> {
    SAMPLE_COMPONENT
        .lines()
        .enumerate()
        .find_map(|(line, text)| {
            let start = text.find(word)?;
            Some(json!({
                "start": { "line": line, "character": start },
                "end": { "line": line, "character": start + word.len() }
            }))
        })
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let word = std::env::args().nth(1).unwrap_or_else(|| "count".to_string());
    let range = word_range(&word).ok_or("word not found in the sample component")?;

    let stream = TcpStream::connect("127.0.0.1:8081").await?;
    let (read, mut write) = stream.into_split();
    let mut reader = BufReader::new(read);

    // 1. Initialize
    send(
        &mut write,
        json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": "initialize",
            "params": {
                "processId": null,
                "rootUri": null,
                "capabilities": {},
                "initializationOptions": { "lang": "ts" }
            }
        }),
    )
    .await?;
    wait_for_response(&mut reader, &mut write, 1).await?;

    send(
        &mut write,
        json!({ "jsonrpc": "2.0", "method": "initialized", "params": {} }),
    )
    .await?;

    // 2. Open the sample component
    send(
        &mut write,
        json!({
            "jsonrpc": "2.0",
            "method": "textDocument/didOpen",
            "params": {
                "textDocument": {
                    "uri": SAMPLE_URI,
                    "languageId": "vue",
                    "version": 1,
                    "text": SAMPLE_COMPONENT
                }
            }
        }),
    )
    .await?;

    // 3. Generate a declaration for the selected word. The server sends status
    // notifications and a workspace/applyEdit request before answering.
    send(
        &mut write,
        json!({
            "jsonrpc": "2.0",
            "id": 2,
            "method": "workspace/executeCommand",
            "params": {
                "command": "vue-fast-script.generate",
                "arguments": [SAMPLE_URI, range]
            }
        }),
    )
    .await?;
    wait_for_response(&mut reader, &mut write, 2).await?;

    Ok(())
}

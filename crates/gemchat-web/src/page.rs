//! Embedded single-page chat frontend.
//!
//! Inline CSS and JavaScript, no external assets. The page keeps its session
//! id in `sessionStorage`, so each browser tab is one chat session.

const CHAT_HTML: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>__TITLE__</title>
<style>
*{box-sizing:border-box;margin:0;padding:0}
html,body{height:100%;font-family:-apple-system,BlinkMacSystemFont,"Segoe UI",Roboto,sans-serif;background:#1e1e1e;color:#d4d4d4}
body{display:flex}
.sidebar{width:240px;flex-shrink:0;background:#252526;border-right:1px solid #3c3c3c;padding:20px;display:flex;flex-direction:column;gap:14px}
.sidebar h2{font-size:15px;font-weight:600}
.sidebar code{background:#313131;padding:2px 6px;border-radius:4px;font-size:12px}
.sidebar button{padding:8px 12px;background:#3a3d41;color:#d4d4d4;border:1px solid #555;border-radius:6px;cursor:pointer}
.sidebar button:hover{background:#45494e}
.sidebar details{font-size:13px}
.sidebar summary{cursor:pointer;color:#9d9d9d}
.sidebar ul{margin-top:8px;padding-left:16px;max-height:50vh;overflow-y:auto}
.sidebar .err{color:#f48771;margin-top:8px}
.main{flex:1;display:flex;flex-direction:column;min-width:0}
.main h1{padding:16px 24px;font-size:20px;border-bottom:1px solid #3c3c3c}
.messages{flex:1;overflow-y:auto;padding:20px 24px;display:flex;flex-direction:column;gap:12px}
.msg{max-width:760px;padding:10px 14px;border-radius:10px;line-height:1.5;white-space:pre-wrap;word-wrap:break-word}
.msg.user{align-self:flex-end;background:#264f78}
.msg.assistant{align-self:flex-start;background:#2d2d30;border:1px solid #3c3c3c}
.msg.error{align-self:center;color:#f48771;font-size:14px}
.thinking{align-self:flex-start;color:#9d9d9d;font-size:14px}
.thinking::after{content:'...';animation:dots 1.2s infinite}
@keyframes dots{0%,20%{content:'.'}40%{content:'..'}60%,100%{content:'...'}}
form{display:flex;gap:8px;padding:16px 24px;border-top:1px solid #3c3c3c}
form textarea{flex:1;padding:10px 12px;background:#313131;color:#d4d4d4;border:1px solid #3c3c3c;border-radius:8px;font:inherit;resize:none}
form button{padding:10px 18px;background:#0e639c;color:#fff;border:none;border-radius:8px;cursor:pointer}
form button:disabled{opacity:.5;cursor:not-allowed}
</style>
</head>
<body>
<aside class="sidebar">
  <h2>Settings</h2>
  <div>Model: <code>__MODEL__</code></div>
  <button id="clear" type="button">Clear chat</button>
  <details id="models">
    <summary>Available models</summary>
    <div id="modelList"></div>
  </details>
</aside>
<main class="main">
  <h1>__TITLE__</h1>
  <div class="messages" id="messages"></div>
  <form id="form">
    <textarea id="prompt" rows="2" placeholder="Type your question..." autofocus></textarea>
    <button id="send" type="submit">Send</button>
  </form>
</main>
<script>
function newSessionId() {
  if (window.crypto && crypto.randomUUID) return crypto.randomUUID();
  const b = crypto.getRandomValues(new Uint8Array(16));
  b[6] = (b[6] & 0x0f) | 0x40;
  b[8] = (b[8] & 0x3f) | 0x80;
  const h = Array.from(b, x => x.toString(16).padStart(2, "0")).join("");
  return `${h.slice(0,8)}-${h.slice(8,12)}-${h.slice(12,16)}-${h.slice(16,20)}-${h.slice(20)}`;
}

let sessionId = sessionStorage.getItem("gemchat-session");
if (!sessionId) {
  sessionId = newSessionId();
  sessionStorage.setItem("gemchat-session", sessionId);
}
const base = `/api/sessions/${sessionId}`;

const list = document.getElementById("messages");
const form = document.getElementById("form");
const input = document.getElementById("prompt");
const send = document.getElementById("send");

function bubble(cls, text) {
  const div = document.createElement("div");
  div.className = "msg " + cls;
  div.textContent = text;
  list.appendChild(div);
  list.scrollTop = list.scrollHeight;
  return div;
}

function render(messages) {
  list.replaceChildren();
  for (const m of messages) bubble(m.role, m.content);
}

async function load() {
  const res = await fetch(`${base}/messages`);
  if (res.ok) render((await res.json()).messages);
}

form.addEventListener("submit", async (e) => {
  e.preventDefault();
  const prompt = input.value;
  if (!prompt.trim()) return;
  input.value = "";
  send.disabled = true;
  bubble("user", prompt);
  const thinking = document.createElement("div");
  thinking.className = "thinking";
  thinking.textContent = "Thinking";
  list.appendChild(thinking);
  try {
    const res = await fetch(`${base}/messages`, {
      method: "POST",
      headers: {"Content-Type": "application/json"},
      body: JSON.stringify({prompt})
    });
    const body = await res.json();
    if (body.messages) render(body.messages);
    if (body.status === "failed") bubble("error", "Error: " + body.reason);
    else if (body.error) bubble("error", "Error: " + body.error);
  } catch (err) {
    bubble("error", "Error: " + err);
  } finally {
    thinking.remove();
    send.disabled = false;
    input.focus();
  }
});

input.addEventListener("keydown", (e) => {
  if (e.key === "Enter" && !e.shiftKey) {
    e.preventDefault();
    form.requestSubmit();
  }
});

document.getElementById("clear").addEventListener("click", async () => {
  await fetch(`${base}/clear`, {method: "POST"});
  render([]);
});

document.getElementById("models").addEventListener("toggle", async (e) => {
  if (!e.target.open) return;
  const out = document.getElementById("modelList");
  out.textContent = "Loading...";
  try {
    const res = await fetch("/api/models");
    const body = await res.json();
    if (!res.ok) throw new Error(body.error || res.statusText);
    const ul = document.createElement("ul");
    for (const m of body.models) {
      const li = document.createElement("li");
      li.textContent = m.name;
      ul.appendChild(li);
    }
    out.replaceChildren(ul);
  } catch (err) {
    out.replaceChildren();
    const div = document.createElement("div");
    div.className = "err";
    div.textContent = "Could not list models: " + err.message;
    out.appendChild(div);
  }
});

load();
</script>
</body>
</html>
"##;

const HALTED_HTML: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>__TITLE__</title>
<style>
body{font-family:-apple-system,BlinkMacSystemFont,"Segoe UI",Roboto,sans-serif;background:#1e1e1e;color:#d4d4d4;padding:40px}
h1{font-size:20px;margin-bottom:20px}
.error{background:#5a1d1d;border:1px solid #be1100;color:#f48771;padding:14px 18px;border-radius:8px;max-width:720px}
</style>
</head>
<body>
<h1>__TITLE__</h1>
<div class="error">__REASON__</div>
</body>
</html>
"##;

/// The chat page for a configured server.
pub fn render_chat(title: &str, model: &str) -> String {
    fill(CHAT_HTML, &[("__TITLE__", title), ("__MODEL__", model)])
}

/// The page shown instead of the chat when configuration failed.
pub fn render_halted(title: &str, reason: &str) -> String {
    fill(HALTED_HTML, &[("__TITLE__", title), ("__REASON__", reason)])
}

/// Substitute every placeholder in one pass; substituted values are never
/// scanned again.
fn fill(template: &str, vars: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    loop {
        let next = vars
            .iter()
            .filter_map(|(key, value)| rest.find(key).map(|at| (at, *key, *value)))
            .min_by_key(|(at, _, _)| *at);
        match next {
            Some((at, key, value)) => {
                out.push_str(&rest[..at]);
                out.push_str(&escape_html(value));
                rest = &rest[at + key.len()..];
            }
            None => {
                out.push_str(rest);
                return out;
            }
        }
    }
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

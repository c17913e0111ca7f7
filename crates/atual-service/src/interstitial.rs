//! Ad interstitial shown before following a tracking link when AdSense is
//! configured. The page is built per request by substituting placeholders in
//! an inline template.

use url::Url;

/// AdSense identifiers needed to render the ad slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdPlacement {
    pub publisher_id: String,
    pub slot_id: String,
}

const TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="pt-BR">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Redirecionando - Atual.bot</title>
    <style>
        * { margin: 0; padding: 0; box-sizing: border-box; }
        body {
            font-family: 'Segoe UI', Tahoma, Geneva, Verdana, sans-serif;
            background: linear-gradient(135deg, #0f1419 0%, #1a2332 50%, #0f1419 100%);
            color: #ffffff;
            min-height: 100vh;
            display: flex;
            align-items: center;
            justify-content: center;
        }
        .container {
            max-width: 900px;
            width: 90%;
            background: rgba(26, 35, 50, 0.95);
            border-radius: 20px;
            padding: 40px;
            text-align: center;
            border: 1px solid rgba(0, 212, 255, 0.2);
        }
        .logo { font-size: 2.5rem; font-weight: bold; color: #00d4ff; margin-bottom: 10px; }
        .subtitle { color: #a0a9b8; font-size: 1.1rem; margin-bottom: 20px; }
        .content-info {
            background: rgba(0, 212, 255, 0.1);
            border: 1px solid rgba(0, 212, 255, 0.3);
            border-radius: 15px;
            padding: 20px;
            margin: 30px 0;
        }
        .content-title { font-size: 1.3rem; color: #00d4ff; margin-bottom: 10px; }
        .timer {
            font-size: 1.2rem;
            margin: 20px 0;
            padding: 15px;
            border: 1px solid rgba(255, 107, 53, 0.3);
            border-radius: 10px;
            color: #ff6b35;
        }
        .ad-container {
            min-height: 300px;
            margin: 30px 0;
            padding: 20px;
            border-radius: 15px;
            border: 2px dashed rgba(0, 212, 255, 0.3);
        }
        .continue-btn {
            display: none;
            background: linear-gradient(45deg, #00d4ff, #0099cc);
            color: white;
            padding: 15px 40px;
            border: none;
            border-radius: 50px;
            font-size: 1.1rem;
            font-weight: bold;
            cursor: pointer;
        }
        .footer { margin-top: 30px; color: #6b7280; font-size: 0.9rem; }
        @media (max-width: 768px) {
            .container { padding: 20px; margin: 20px; }
            .logo { font-size: 2rem; }
        }
    </style>
</head>
<body>
    <div class="container">
        <div class="logo">Atual.bot</div>
        <div class="subtitle">Plataforma Inteligente de Automação</div>

        <div class="content-info">
            <div class="content-title">📋 {{TITLE}}</div>
            <p>Você será redirecionado em instantes...</p>
        </div>

        <div class="timer" id="timer">⏱️ Aguarde o carregamento do anúncio...</div>

        <div class="ad-container">
            <script async src="https://pagead2.googlesyndication.com/pagead/js/adsbygoogle.js?client={{PUBLISHER_ID}}"
                 crossorigin="anonymous"></script>
            <ins class="adsbygoogle"
                 style="display:block; width: 100%; height: 250px;"
                 data-ad-client="{{PUBLISHER_ID}}"
                 data-ad-slot="{{SLOT_ID}}"
                 data-ad-format="auto"
                 data-full-width-responsive="true"></ins>
            <script>(adsbygoogle = window.adsbygoogle || []).push({});</script>
        </div>

        <button id="continue-btn" class="continue-btn" onclick="continueToContent()">
            🚀 Continuar para o Conteúdo
        </button>
        <noscript><a href="{{DESTINATION_HREF}}">Continuar para o conteúdo</a></noscript>

        <div class="footer">
            <p>Powered by Atual.bot</p>
        </div>
    </div>

    <script>
        const destination = {{DESTINATION_JS}};
        const timerElement = document.getElementById('timer');
        const continueBtn = document.getElementById('continue-btn');
        let countdown = 5;

        function continueToContent() {
            window.location.href = destination;
        }

        function updateTimer() {
            if (countdown > 0) {
                timerElement.textContent = `⏱️ Redirecionamento em ${countdown} segundos...`;
                countdown--;
                setTimeout(updateTimer, 1000);
            } else {
                timerElement.textContent = '✅ Anúncio carregado com sucesso!';
                continueBtn.style.display = 'inline-block';
            }
        }

        updateTimer();

        // Fall back to an automatic redirect if the visitor never clicks
        setTimeout(continueToContent, 10000);
    </script>
</body>
</html>
"#;

pub fn render_interstitial(destination_url: &str, title: &str, placement: &AdPlacement) -> String {
    let mut page = String::with_capacity(TEMPLATE.len() + destination_url.len() * 2);
    let mut rest = TEMPLATE;

    // Single pass so substituted text is never scanned for placeholders again
    while let Some(start) = rest.find("{{") {
        let Some(len) = rest[start..].find("}}") else {
            break;
        };
        page.push_str(&rest[..start]);
        match &rest[start + 2..start + len] {
            "TITLE" => page.push_str(&escape_html(title)),
            "PUBLISHER_ID" => page.push_str(&escape_html(&placement.publisher_id)),
            "SLOT_ID" => page.push_str(&escape_html(&placement.slot_id)),
            "DESTINATION_HREF" => page.push_str(&escape_html(destination_url)),
            "DESTINATION_JS" => page.push_str(&script_string_literal(destination_url)),
            _ => page.push_str(&rest[start..start + len + 2]),
        }
        rest = &rest[start + len + 2..];
    }
    page.push_str(rest);
    page
}

/// Only absolute http(s) URLs may be followed from the interstitial script.
pub fn is_web_destination(destination_url: &str) -> bool {
    Url::parse(destination_url).is_ok_and(|url| matches!(url.scheme(), "http" | "https"))
}

pub fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// Double-quoted JavaScript string literal safe to embed inside `<script>`.
pub fn script_string_literal(value: &str) -> String {
    let mut literal = String::with_capacity(value.len() + 2);
    literal.push('"');
    for ch in value.chars() {
        match ch {
            '\\' => literal.push_str("\\\\"),
            '"' => literal.push_str("\\\""),
            '\n' => literal.push_str("\\n"),
            '\r' => literal.push_str("\\r"),
            '<' | '>' | '&' | '\'' | '\u{2028}' | '\u{2029}' => {
                literal.push_str(&format!("\\u{:04x}", ch as u32))
            }
            other if other.is_control() => literal.push_str(&format!("\\u{:04x}", other as u32)),
            other => literal.push(other),
        }
    }
    literal.push('"');
    literal
}

//! 随归档附带的两段固定模板：PWA manifest 片段与 HTML head 片段。

/// manifest 片段在归档中的文件名。
pub const MANIFEST_SNIPPET_NAME: &str = "SNIPPET_manifest.json";
/// head 片段在归档中的文件名。
pub const HEAD_SNIPPET_NAME: &str = "SNIPPET_head.html";

pub const MANIFEST_SNIPPET: &str = r##"{
  "name": "IconGen PWA",
  "short_name": "IconGen",
  "theme_color": "#3b82f6",
  "background_color": "#ffffff",
  "display": "standalone",
  "start_url": "/",
  "icons": [
    { "src": "/logo192.png", "sizes": "192x192", "type": "image/png", "purpose": "any maskable" },
    { "src": "/logo512.png", "sizes": "512x512", "type": "image/png", "purpose": "any maskable" }
  ]
}
"##;

pub const HEAD_SNIPPET: &str = r##"<!-- Theme & Icons -->
<meta name="theme-color" content="#3b82f6" />
<link rel="icon" type="image/png" sizes="16x16" href="/logo16.png" />
<link rel="icon" type="image/png" sizes="32x32" href="/logo32.png" />
<link rel="icon" type="image/png" sizes="48x48" href="/logo48.png" />
<link rel="icon" type="image/x-icon" href="/favicon.ico" />
<link rel="apple-touch-icon" sizes="180x180" href="/apple-touch-icon.png" />
<link rel="apple-touch-icon" sizes="167x167" href="/apple-touch-icon-3d.png" />
<link rel="apple-touch-icon" sizes="152x152" href="/apple-touch-icon-3d.png" />
"##;

/// 按写入顺序列出所有片段。
pub const SNIPPETS: [(&str, &str); 2] = [
    (MANIFEST_SNIPPET_NAME, MANIFEST_SNIPPET),
    (HEAD_SNIPPET_NAME, HEAD_SNIPPET),
];

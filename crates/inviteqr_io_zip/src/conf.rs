//! Archive layout constants and default preset factories.

use crate::spec::SpecArchiveOptions;

/// Folder holding one image per generated item.
pub const C_DIR_QR_CODES: &str = "qr_codes";
/// Static landing page stored at the archive root.
pub const C_FILE_WELCOME: &str = "welcome.html";
/// Archive file name prefix.
pub const C_PREFIX_ARCHIVE: &str = "qr_codes_";
/// Archive file extension.
pub const C_EXT_ARCHIVE: &str = "zip";
/// Sortable UTC stamp with `-` in place of `:`, second precision.
pub const C_FMT_TIMESTAMP: &str = "%Y-%m-%dT%H-%M-%S";

/// Prefix of every archive failure message.
pub const C_PREFIX_ARCHIVE_ERROR: &str = "Failed to create ZIP file: ";
/// Message for an archive request without items.
pub const C_MSG_NO_ITEMS: &str = "No QR codes to package";

/// Greeting page. Reads `first`/`last` from the query string on load.
pub const C_HTML_WELCOME: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>Welcome</title>
<style>
body{display:flex;justify-content:center;align-items:center;height:100vh;margin:0;font-family:sans-serif;background:#f0f0f0}
h1{color:#333;font-size:2rem}
</style>
</head>
<body>
<h1 id="greet"></h1>
<script>
const params = new URLSearchParams(location.search);
const first = params.get('first') || 'Guest';
const last = params.get('last') || '';
document.getElementById('greet').textContent = `Welcome, ${first} ${last}!`;
</script>
</body>
</html>
"#;

/// Build default archive options.
pub fn derive_default_archive_options() -> SpecArchiveOptions {
    SpecArchiveOptions::default()
}

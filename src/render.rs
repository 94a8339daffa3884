//! Fixed HTML documents and the fragments bracketing streamed item bodies.

const HTML_HEADER: &str = r#"<!DOCTYPE html>
<head>
  <style>
    .header, .content {
      margin: auto;
      width: 75%;
      display: flex;
      justify-content: center;
    }
    .form {
      width: 100%;
      display: flex;
      justify-content: center;
      flex-direction: column;
    }
    .paste {
      margin-left: 10%;
      margin-right: 10%;
      margin-bottom: 10px;
      width: 80%;
      height: 60vh;
      resize: none;
    }
    .button {
      margin-left: 10%;
      margin-right: auto;
      width: 100px;
    }
  </style>
</head>
"#;

const FORM_BODY: &str = r#"<body>
  <div class="header">
    <h1>Paste Item</h1>
  </div>
  <div class="content">
    <form class="form" action="/" method="post">
      <textarea class="paste" name="content" required="true" placeholder="Paste something..."></textarea>
      <button class="button" type="submit">Paste</button>
    </form>
  </div>
</body>
"#;

/// Opens the display document around a streamed item body.
pub const ITEM_PREFACE: &str = r#"<!DOCTYPE html>
<body>
  <center><h1>Get Item</h1></center>
  <pre>
"#;

/// Closes the display document after the item body.
pub const ITEM_TRAILER: &str = r#"  </pre>
</body>
"#;

/// Shown for retrieval of a key absent from the store.
pub const MISSING_ITEM: &str = r#"<!DOCTYPE html>
<body>
  <center><h1>Missing Item</h1></center>
</body>
"#;

/// Shown for any method other than GET or POST.
pub const METHOD_NOT_ALLOWED: &str = r#"<!DOCTYPE html>
<body>
  <center><h1>405 Method Not Allowed</h1></center>
</body>
"#;

/// Submission form served at the root path.
pub fn submission_form() -> String {
    format!("{HTML_HEADER}{FORM_BODY}")
}

/// Confirmation page embedding the retrieval URL of a newly created item.
///
/// # Arguments
/// - `item_url`: Absolute URL the item can be fetched from.
pub fn item_created(item_url: &str) -> String {
    format!(
        r#"{HTML_HEADER}<body>
  <div class="header">
    <h1>Pasted Item</h1>
  </div>
  <div class="content">
    <p>
      <a href="{item_url}">{item_url}</a>
    </p>
  </div>
</body>
"#
    )
}

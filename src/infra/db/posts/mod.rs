mod read;
mod types;
mod write;

const POST_COLUMNS: &str = "id, title, subtitle, date, body, author, img_url";

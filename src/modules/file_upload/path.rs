use chrono::NaiveDate;

use crate::modules::file_upload::model::{base_name, UploadConfig};

/// Relative storage path for an upload: optional username, optional
/// `YYYY/MM/DD`, then the file name.
pub fn build_upload_path(
    config: &UploadConfig,
    username: &str,
    date: NaiveDate,
    filename: &str,
) -> String {
    let mut segments: Vec<String> = Vec::with_capacity(3);
    if config.path_from_username {
        segments.push(username.to_string());
    }
    if config.restrict_by_date {
        segments.push(date.format("%Y/%m/%d").to_string());
    }
    segments.push(base_name(filename).to_string());
    segments.join("/")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(by_user: bool, by_date: bool) -> UploadConfig {
        UploadConfig { path_from_username: by_user, restrict_by_date: by_date, ..Default::default() }
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 5).unwrap()
    }

    #[test]
    fn test_user_and_date() {
        assert_eq!(build_upload_path(&config(true, true), "u", date(), "x.png"), "u/2024/03/05/x.png");
    }

    #[test]
    fn test_date_only_is_default() {
        assert_eq!(
            build_upload_path(&UploadConfig::default(), "u", date(), "x.png"),
            "2024/03/05/x.png"
        );
    }

    #[test]
    fn test_user_only() {
        assert_eq!(build_upload_path(&config(true, false), "u", date(), "x.png"), "u/x.png");
    }

    #[test]
    fn test_no_namespacing() {
        assert_eq!(build_upload_path(&config(false, false), "u", date(), "x.png"), "x.png");
    }

    #[test]
    fn test_client_directories_dropped() {
        assert_eq!(
            build_upload_path(&config(false, false), "u", date(), r"C:\Users\me\x.png"),
            "x.png"
        );
        assert_eq!(build_upload_path(&config(false, true), "u", date(), "../../x.png"), "2024/03/05/x.png");
    }
}

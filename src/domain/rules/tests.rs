// Unit tests for pipeline rules

use super::*;

#[test]
fn test_classify_direct_image_extensions() {
    for url in [
        "https://example.com/a/photo.png",
        "https://example.com/photo.JPG",
        "https://example.com/photo.jpeg?size=large",
        "http://cdn.example.org/anim.gif",
        "https://example.com/x.bmp",
        "https://example.com/x.WebP#frag",
    ] {
        assert_eq!(
            SourceClassifier::classify(url),
            FetchStrategy::DirectImage,
            "{}",
            url
        );
    }
}

#[test]
fn test_classify_delegated() {
    for url in [
        "https://www.youtube.com/watch?v=abc",
        "https://example.com/photo.png.html",
        "https://example.com/photo.tiff",
        "https://example.com/gallery/",
        "not a url at all.png",
        "",
    ] {
        assert_eq!(SourceClassifier::classify(url), FetchStrategy::Delegated, "{}", url);
    }
}

#[test]
fn test_classify_redirector_is_delegated() {
    let url = "https://www.google.com/url?sa=i&url=https%3A%2F%2Fexample.com%2Fcat.png&img.png";
    assert_eq!(SourceClassifier::classify(url), FetchStrategy::Delegated);

    let url = "https://redirect.example.com/out.png?url=https://example.com/cat.png";
    assert_eq!(SourceClassifier::classify(url), FetchStrategy::Delegated);
}

#[test]
fn test_classify_query_extension_does_not_count() {
    // Only the path component decides
    let url = "https://example.com/view?file=cat.png";
    assert_eq!(SourceClassifier::classify(url), FetchStrategy::Delegated);
}

#[test]
fn test_jpeg_quality_mapping() {
    assert_eq!(ImageQualityMapper::jpeg_qscale(100), 2);
    assert_eq!(ImageQualityMapper::jpeg_qscale(80), 7);
    assert_eq!(ImageQualityMapper::jpeg_qscale(50), 16);
    assert_eq!(ImageQualityMapper::jpeg_qscale(1), 31);
}

#[test]
fn test_jpeg_quality_matches_truncated_formula() {
    for quality in 2..=100u8 {
        let expected = (200 + 29 * (100 - u32::from(quality))) / 100;
        assert_eq!(ImageQualityMapper::jpeg_qscale(quality), expected, "q={}", quality);
    }
    assert_eq!(ImageQualityMapper::jpeg_qscale(2), 30);
    assert_eq!(ImageQualityMapper::jpeg_qscale(1), ImageQualityMapper::JPEG_WORST);
}

#[test]
fn test_jpeg_quality_mapping_is_monotonic() {
    let mut previous = ImageQualityMapper::jpeg_qscale(1);
    for quality in 2..=100u8 {
        let current = ImageQualityMapper::jpeg_qscale(quality);
        assert!(current <= previous);
        assert!((2..=31).contains(&current));
        previous = current;
    }
}

#[test]
fn test_quality_flag_per_format() {
    assert_eq!(ImageQualityMapper::quality_flag("JPEG", 100).as_deref(), Some("2"));
    assert_eq!(ImageQualityMapper::quality_flag("webp", 37).as_deref(), Some("37"));
    assert_eq!(ImageQualityMapper::quality_flag("png", 37), None);
    assert_eq!(ImageQualityMapper::quality_flag("mp4", 80), None);
}

#[test]
fn test_filename_from_url() {
    assert_eq!(
        DownloadNaming::filename_from_url("https://example.com/images/cat.png?x=1"),
        Some("cat.png".to_string())
    );
    assert_eq!(
        DownloadNaming::filename_from_url("https://example.com/images/archive.tar.gz"),
        Some("archive.tar.gz".to_string())
    );
    assert_eq!(DownloadNaming::filename_from_url("https://example.com/images/"), None);
    assert_eq!(DownloadNaming::filename_from_url("https://example.com/noext"), None);
    assert_eq!(
        DownloadNaming::filename_from_url("https://example.com/file.toolong"),
        None
    );
}

#[test]
fn test_filename_from_url_keeps_dot_only_names() {
    // Any basename with a short extension is reused, even without a stem
    assert_eq!(
        DownloadNaming::filename_from_url("https://example.com/.png"),
        Some(".png".to_string())
    );
    assert_eq!(
        DownloadNaming::filename_from_url("https://example.com/img/cover."),
        Some("cover.".to_string())
    );
}

#[test]
fn test_extension_for_content_type() {
    assert_eq!(DownloadNaming::extension_for_content_type("image/jpeg"), ".jpg");
    assert_eq!(DownloadNaming::extension_for_content_type("image/png; charset=binary"), ".png");
    assert_eq!(DownloadNaming::extension_for_content_type("image/gif"), ".gif");
    assert_eq!(DownloadNaming::extension_for_content_type("IMAGE/WEBP"), ".webp");
    assert_eq!(DownloadNaming::extension_for_content_type("text/html"), ".jpg");
    assert_eq!(DownloadNaming::extension_for_content_type(""), ".jpg");
}

#[test]
fn test_synthesized_name_shape() {
    let name = DownloadNaming::synthesized_name(".webp");
    assert!(name.starts_with("downloaded_image_"));
    assert!(name.ends_with(".webp"));
    let token = &name["downloaded_image_".len()..name.len() - ".webp".len()];
    assert_eq!(token.len(), 8);
    assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
}

#[test]
fn test_destination_from_download_line() {
    let stdout = "[youtube] abc: Downloading webpage\n\
                  [download] Destination: /tmp/ws/video/Clip.mp4\n\
                  [download] 100% of 1.00MiB";
    assert_eq!(
        DestinationParser::find_destination(stdout, "", MediaKind::Image),
        Some("/tmp/ws/video/Clip.mp4".to_string())
    );
}

#[test]
fn test_destination_from_stderr_and_writing_marker() {
    let stderr = "Writing video to:   relative/name.webm  \n";
    assert_eq!(
        DestinationParser::find_destination("nothing here", stderr, MediaKind::Image),
        Some("relative/name.webm".to_string())
    );
}

#[test]
fn test_destination_prefers_stdout_order() {
    let stdout = "[download] Destination: first.mp4";
    let stderr = "[download] Destination: second.mp4";
    assert_eq!(
        DestinationParser::find_destination(stdout, stderr, MediaKind::Image),
        Some("first.mp4".to_string())
    );
}

#[test]
fn test_destination_first_marker_wins_for_audio() {
    let stdout = "[download] Destination: /w/audio/Song.webm\n\
                  [ExtractAudio] Destination: /w/audio/Song.mp3\n\
                  Deleting original file /w/audio/Song.webm";
    assert_eq!(
        DestinationParser::find_destination(stdout, "", MediaKind::Audio),
        Some("/w/audio/Song.webm".to_string())
    );
}

#[test]
fn test_destination_extract_audio_line_alone() {
    let stdout = "[youtube] abc: Downloading webpage\n\
                  [ExtractAudio] Destination: /w/audio/Song.mp3";
    assert_eq!(
        DestinationParser::find_destination(stdout, "", MediaKind::Audio),
        Some("/w/audio/Song.mp3".to_string())
    );
}

#[test]
fn test_destination_first_marker_wins_for_video() {
    let stdout = "[download] Destination: /w/video/Clip.f137.mp4\n\
                  [download] Destination: /w/video/Clip.f140.m4a\n\
                  [Merger] Merging formats into \"/w/video/Clip.mp4\"";
    assert_eq!(
        DestinationParser::find_destination(stdout, "", MediaKind::Video),
        Some("/w/video/Clip.f137.mp4".to_string())
    );
}

#[test]
fn test_destination_merger_line_only_counts_for_video() {
    let stdout = "[youtube] abc: Downloading webpage\n\
                  [Merger] Merging formats into \"/w/video/Clip.mp4\"\n\
                  [download] Destination: /w/video/late.mp4";
    assert_eq!(
        DestinationParser::find_destination(stdout, "", MediaKind::Video),
        Some("/w/video/Clip.mp4".to_string())
    );
    assert_eq!(
        DestinationParser::find_destination(stdout, "", MediaKind::Audio),
        Some("/w/video/late.mp4".to_string())
    );
}

#[test]
fn test_destination_missing_marker() {
    assert_eq!(
        DestinationParser::find_destination("[generic] done", "ERROR: nope", MediaKind::Video),
        None
    );
    assert_eq!(
        DestinationParser::find_destination("[download] Destination:   ", "", MediaKind::Image),
        None
    );
}

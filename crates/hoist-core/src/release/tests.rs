use super::*;

#[test]
fn major_bump_resets_minor_and_patch() {
    let tag = ReleaseTag::parse_or_zero("v1.2.3");
    assert_eq!(tag.bumped(BumpKind::Major).as_str(), "v2.0.0");
}

#[test]
fn minor_bump_resets_patch() {
    let tag = ReleaseTag::parse_or_zero("v1.2.3");
    assert_eq!(tag.bumped(BumpKind::Minor).as_str(), "v1.3.0");
}

#[test]
fn patch_bump_increments_patch_only() {
    let tag = ReleaseTag::parse_or_zero("v1.2.3");
    assert_eq!(tag.bumped(BumpKind::Patch).as_str(), "v1.2.4");
}

#[test]
fn build_metadata_is_ignored_for_bumping_but_kept_in_raw_form() {
    let tag = ReleaseTag::parse_or_zero("v1.2.3+identifier.1");
    assert_eq!(tag.as_str(), "v1.2.3+identifier.1");
    assert_eq!((tag.major(), tag.minor(), tag.patch()), (1, 2, 3));
    assert_eq!(tag.bumped(BumpKind::Minor).as_str(), "v1.3.0");
}

#[test]
fn unparseable_tags_degrade_to_zero() {
    for raw in ["release-7", "1.2.3", "v1.2", "vabc", ""] {
        let tag = ReleaseTag::parse_or_zero(raw);
        assert_eq!(tag, ReleaseTag::zero(), "input: {raw:?}");
        assert_eq!(tag.as_str(), "v0.0.0", "input: {raw:?}");
    }
}

#[test]
fn archive_name_combines_project_and_tag() {
    let tag = ReleaseTag::parse_or_zero("v1.2.1");
    let archive = ArchiveName::new("myapp", &tag);
    assert_eq!(archive.as_str(), "myapp_v1.2.1");
    assert_eq!(archive.tarball(), "myapp_v1.2.1.tar.gz");
}

#[test]
fn project_name_validation() {
    assert!(validate_project_name("myapp").is_ok());
    assert!(validate_project_name("my_app2").is_ok());
    assert!(validate_project_name("MyApp").is_err());
    assert!(validate_project_name("my app").is_err());
    assert!(validate_project_name("_leading").is_err());
    assert!(validate_project_name("").is_err());
}

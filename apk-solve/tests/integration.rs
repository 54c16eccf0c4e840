//! Integration tests for `apk-solve`.

use apk_solve::{Cancellation, Disqualified, Error, NamedIndex, Resolver, Solution};
use apk_types::Package;
use pretty_assertions::assert_eq;
use rstest::rstest;
use testresult::TestResult;

fn create_test_package(
    name: &str,
    version: &str,
    dependencies: Vec<&str>,
    provides: Vec<&str>,
    install_if: Vec<&str>,
) -> Package {
    Package {
        name: name.to_string(),
        version: version.to_string(),
        origin: name.to_string(),
        repository: "https://example.org/main".to_string(),
        provider_priority: 0,
        dependencies: dependencies.into_iter().map(str::to_string).collect(),
        provides: provides.into_iter().map(str::to_string).collect(),
        install_if: install_if.into_iter().map(str::to_string).collect(),
    }
}

fn create_test_index(packages: Vec<Package>) -> NamedIndex {
    NamedIndex::new("", "https://example.org/main", packages)
}

fn installed_files(solution: &Solution) -> Vec<String> {
    solution
        .packages
        .iter()
        .map(|package| package.filename())
        .collect()
}

fn installed_names(solution: &Solution) -> Vec<&str> {
    solution
        .packages
        .iter()
        .map(|package| package.name.as_str())
        .collect()
}

#[test]
fn single_package_without_dependencies() -> TestResult {
    let resolver = Resolver::new([create_test_index(vec![create_test_package(
        "foo",
        "1.0",
        vec![],
        vec![],
        vec![],
    )])]);

    let solution = resolver.packages_with_dependencies(&["foo"])?;

    assert_eq!(vec!["foo-1.0.apk"], installed_files(&solution));
    assert!(solution.conflicts.is_empty());
    Ok(())
}

#[rstest]
#[case::less("foo<2.0", "foo-1.0.apk")]
#[case::equal("foo=2.0", "foo-2.0.apk")]
#[case::greater_or_equal("foo>=1.0", "foo-2.0.apk")]
#[case::fuzzy("foo~=1", "foo-1.0.apk")]
#[case::unconstrained("foo", "foo-2.0.apk")]
fn version_pins_select_the_right_candidate(
    #[case] request: &str,
    #[case] expected: &str,
) -> TestResult {
    let resolver = Resolver::new([create_test_index(vec![
        create_test_package("foo", "1.0", vec![], vec![], vec![]),
        create_test_package("foo", "2.0", vec![], vec![], vec![]),
    ])]);

    let solution = resolver.packages_with_dependencies(&[request])?;

    assert_eq!(vec![expected.to_string()], installed_files(&solution));
    Ok(())
}

#[test]
fn provider_satisfies_a_virtual_name() -> TestResult {
    let resolver = Resolver::new([create_test_index(vec![create_test_package(
        "bar",
        "1.0",
        vec![],
        vec!["foo=1.0"],
        vec![],
    )])]);

    let solution = resolver.packages_with_dependencies(&["foo"])?;

    assert_eq!(vec!["bar-1.0.apk"], installed_files(&solution));
    Ok(())
}

#[test]
fn provider_without_version_uses_its_own() -> TestResult {
    let resolver = Resolver::new([create_test_index(vec![create_test_package(
        "busybox",
        "1.36.1-r5",
        vec![],
        vec!["cmd:sh"],
        vec![],
    )])]);

    let solution = resolver.packages_with_dependencies(&["cmd:sh"])?;

    assert_eq!(vec!["busybox-1.36.1-r5.apk"], installed_files(&solution));
    Ok(())
}

#[test]
fn negative_constraint_disqualifies_matching_versions() -> TestResult {
    let resolver = Resolver::new([create_test_index(vec![
        create_test_package("foo", "1.0", vec![], vec![], vec![]),
        create_test_package("foo", "2.0", vec![], vec![], vec![]),
    ])]);

    let solution = resolver.packages_with_dependencies(&["foo", "!foo<2.0"])?;

    assert_eq!(vec!["foo-2.0.apk"], installed_files(&solution));
    Ok(())
}

#[test]
fn deep_chain_installs_dependencies_first() -> TestResult {
    let resolver = Resolver::new([create_test_index(vec![
        create_test_package("a", "1.0", vec!["b"], vec![], vec![]),
        create_test_package("b", "1.0", vec!["c"], vec![], vec![]),
        create_test_package("c", "1.0", vec!["d"], vec![], vec![]),
        create_test_package("d", "1.0", vec![], vec![], vec![]),
    ])]);

    let solution = resolver.packages_with_dependencies(&["a"])?;

    assert_eq!(vec!["d", "c", "b", "a"], installed_names(&solution));
    Ok(())
}

#[test]
fn diamond_dependency_appears_once() -> TestResult {
    let resolver = Resolver::new([create_test_index(vec![
        create_test_package("a", "1.0", vec!["b", "c"], vec![], vec![]),
        create_test_package("b", "1.0", vec!["d"], vec![], vec![]),
        create_test_package("c", "1.0", vec!["d"], vec![], vec![]),
        create_test_package("d", "1.0", vec![], vec![], vec![]),
    ])]);

    let solution = resolver.packages_with_dependencies(&["a"])?;

    assert_eq!(vec!["d", "b", "c", "a"], installed_names(&solution));
    Ok(())
}

#[test]
fn install_if_triggers_after_its_trigger() -> TestResult {
    let resolver = Resolver::new([create_test_index(vec![
        create_test_package("foo", "1.0", vec![], vec![], vec![]),
        create_test_package("bar", "1.0", vec![], vec![], vec!["foo"]),
    ])]);

    let solution = resolver.packages_with_dependencies(&["foo"])?;

    assert_eq!(vec!["foo", "bar"], installed_names(&solution));
    Ok(())
}

#[test]
fn install_if_triggers_chain() -> TestResult {
    let resolver = Resolver::new([create_test_index(vec![
        create_test_package("foo", "1.0", vec![], vec![], vec![]),
        create_test_package("bar", "1.0", vec![], vec![], vec!["foo"]),
        create_test_package("baz", "1.0", vec![], vec![], vec!["bar"]),
    ])]);

    let solution = resolver.packages_with_dependencies(&["foo"])?;

    assert_eq!(vec!["foo", "bar", "baz"], installed_names(&solution));
    Ok(())
}

#[rstest]
#[case::literal_match("1.0", true)]
#[case::algebraically_equal_but_not_literal("1.0-r0", false)]
fn install_if_version_comparison_is_literal(
    #[case] foo_version: &str,
    #[case] triggered: bool,
) -> TestResult {
    let resolver = Resolver::new([create_test_index(vec![
        create_test_package("foo", foo_version, vec![], vec![], vec![]),
        create_test_package("foo-doc", "1.0", vec![], vec![], vec!["foo=1.0"]),
    ])]);

    let solution = resolver.packages_with_dependencies(&["foo"])?;

    assert_eq!(
        triggered,
        installed_names(&solution).contains(&"foo-doc"),
    );
    Ok(())
}

#[test]
fn install_if_spanning_multiple_requests() -> TestResult {
    let resolver = Resolver::new([create_test_index(vec![
        create_test_package("a", "1.0", vec![], vec![], vec![]),
        create_test_package("b", "1.0", vec![], vec![], vec![]),
        create_test_package("c", "1.0", vec![], vec![], vec!["a", "b"]),
    ])]);

    // neither request alone satisfies both triggers
    let partial = resolver.packages_with_dependencies(&["a"])?;
    assert_eq!(vec!["a"], installed_names(&partial));

    let full = resolver.packages_with_dependencies(&["a", "b"])?;
    assert_eq!(vec!["a", "b", "c"], installed_names(&full));
    Ok(())
}

#[test]
fn conflicting_providers_fail_with_the_recorded_reason() {
    let resolver = Resolver::new([create_test_index(vec![
        create_test_package("foo", "1.0", vec![], vec!["baz"], vec![]),
        create_test_package("qux", "1.0", vec![], vec!["baz"], vec![]),
    ])]);

    let error = resolver
        .packages_with_dependencies(&["foo", "qux"])
        .unwrap_err();

    let Error::Constraint { token, source } = error else {
        panic!("expected a constraint error");
    };
    assert_eq!("qux", token);
    assert!(
        source
            .to_string()
            .contains("foo-1.0.apk already provides baz"),
        "unexpected reason: {source}"
    );
}

#[test]
fn dependency_cycles_terminate() -> TestResult {
    let resolver = Resolver::new([create_test_index(vec![
        create_test_package("a", "1.0", vec!["b"], vec![], vec![]),
        create_test_package("b", "1.0", vec!["a"], vec![], vec![]),
    ])]);

    let solution = resolver.packages_with_dependencies(&["a"])?;

    assert_eq!(vec!["b", "a"], installed_names(&solution));
    Ok(())
}

#[test]
fn resolution_is_idempotent() -> TestResult {
    let resolver = Resolver::new([create_test_index(vec![
        create_test_package("a", "1.0", vec!["b", "c"], vec![], vec![]),
        create_test_package("b", "1.0", vec!["c"], vec![], vec![]),
        create_test_package("c", "1.0", vec![], vec![], vec![]),
    ])]);

    let first = resolver.packages_with_dependencies(&["a"])?;
    let second = resolver.packages_with_dependencies(&["a"])?;

    assert_eq!(installed_files(&first), installed_files(&second));
    Ok(())
}

#[test]
fn request_order_does_not_change_the_selected_set() -> TestResult {
    let resolver = Resolver::new([create_test_index(vec![
        create_test_package("a", "1.0", vec!["c"], vec![], vec![]),
        create_test_package("b", "1.0", vec![], vec![], vec![]),
        create_test_package("c", "1.0", vec![], vec![], vec![]),
    ])]);

    let forward = resolver.packages_with_dependencies(&["a", "b"])?;
    let backward = resolver.packages_with_dependencies(&["b", "a"])?;

    let mut forward_names = installed_names(&forward);
    let mut backward_names = installed_names(&backward);
    forward_names.sort_unstable();
    backward_names.sort_unstable();
    assert_eq!(forward_names, backward_names);
    Ok(())
}

#[test]
fn negated_dependencies_become_conflicts() -> TestResult {
    let resolver = Resolver::new([create_test_index(vec![
        create_test_package("a", "1.0", vec!["!b", "c"], vec![], vec![]),
        create_test_package("b", "1.0", vec![], vec![], vec![]),
        create_test_package("c", "1.0", vec![], vec![], vec![]),
    ])]);

    let solution = resolver.packages_with_dependencies(&["a"])?;

    assert_eq!(vec!["c", "a"], installed_names(&solution));
    assert_eq!(vec!["b".to_string()], solution.conflicts);
    Ok(())
}

#[test]
fn missing_dependency_reports_the_trail() {
    let resolver = Resolver::new([create_test_index(vec![create_test_package(
        "a",
        "1.0",
        vec!["nosuch"],
        vec![],
        vec![],
    )])]);

    let error = resolver.packages_with_dependencies(&["a"]).unwrap_err();

    assert_eq!(
        "failed to resolve constraint 'a':\n\
         failed to resolve a dependency of a-1.0:\n\
         nothing provides nosuch",
        error.to_string()
    );
}

#[test]
fn unknown_request_is_not_found() {
    let resolver = Resolver::new([create_test_index(vec![create_test_package(
        "foo",
        "1.0",
        vec![],
        vec![],
        vec![],
    )])]);

    let error = resolver.resolve_package("nosuch", &Disqualified::new());
    assert!(matches!(error, Err(Error::NotFound(name)) if name == "nosuch"));
}

#[test]
fn resolve_package_sorts_best_first() -> TestResult {
    let resolver = Resolver::new([create_test_index(vec![
        create_test_package("foo", "1.0", vec![], vec![], vec![]),
        create_test_package("foo", "3.0", vec![], vec![], vec![]),
        create_test_package("foo", "2.0", vec![], vec![], vec![]),
    ])]);

    let candidates = resolver.resolve_package("foo", &Disqualified::new())?;

    let files: Vec<_> = candidates
        .iter()
        .map(|package| package.filename())
        .collect();
    assert_eq!(vec!["foo-3.0.apk", "foo-2.0.apk", "foo-1.0.apk"], files);
    Ok(())
}

#[test]
fn pinned_request_prefers_the_labeled_index() -> TestResult {
    let indexes = || {
        [
            NamedIndex::new(
                "",
                "https://example.org/main",
                [create_test_package("foo", "1.0", vec![], vec![], vec![])],
            ),
            NamedIndex::new(
                "edge",
                "https://example.org/edge",
                [create_test_package("foo", "2.0", vec![], vec![], vec![])],
            ),
        ]
    };

    let resolver = Resolver::new(indexes());
    let unpinned = resolver.packages_with_dependencies(&["foo"])?;
    assert_eq!(vec!["foo-1.0.apk"], installed_files(&unpinned));

    let resolver = Resolver::new(indexes());
    let pinned = resolver.packages_with_dependencies(&["foo@edge"])?;
    assert_eq!(vec!["foo-2.0.apk"], installed_files(&pinned));
    Ok(())
}

#[test]
fn dependencies_do_not_cross_into_labeled_indexes() {
    let indexes = || {
        [
            NamedIndex::new(
                "",
                "https://example.org/main",
                [create_test_package("app", "1.0", vec!["lib"], vec![], vec![])],
            ),
            NamedIndex::new(
                "edge",
                "https://example.org/edge",
                [create_test_package("lib", "1.0", vec![], vec![], vec![])],
            ),
        ]
    };

    // without the pin the dependency may not come from the labeled index
    let resolver = Resolver::new(indexes());
    let error = resolver.packages_with_dependencies(&["app"]).unwrap_err();
    assert!(
        error
            .to_string()
            .contains("failed to resolve a dependency of app-1.0"),
        "unexpected error: {error}"
    );

    // the pin on the request opens up the labeled index for the subtree
    let resolver = Resolver::new(indexes());
    let solution = resolver
        .packages_with_dependencies(&["app@edge"])
        .expect("pinned request should resolve");
    assert_eq!(vec!["lib", "app"], installed_names(&solution));
}

#[test]
fn packages_may_fulfill_their_own_dependencies() -> TestResult {
    let resolver = Resolver::new([create_test_index(vec![
        // depends on itself by name
        create_test_package("tool", "2.0", vec!["tool>=1.0"], vec![], vec![]),
        // depends on a name it provides itself
        create_test_package("shell", "1.0", vec!["cmd:sh"], vec!["cmd:sh"], vec![]),
    ])]);

    let solution = resolver.packages_with_dependencies(&["tool", "shell"])?;

    let mut names = installed_names(&solution);
    names.sort_unstable();
    assert_eq!(vec!["shell", "tool"], names);
    Ok(())
}

#[test]
fn provider_priority_ranks_competing_providers() -> TestResult {
    let mut low = create_test_package("low", "9.0", vec![], vec!["virt"], vec![]);
    low.provider_priority = 1;
    let mut high = create_test_package("high", "1.0", vec![], vec!["virt"], vec![]);
    high.provider_priority = 100;

    let resolver = Resolver::new([create_test_index(vec![low, high])]);
    let solution = resolver.packages_with_dependencies(&["virt"])?;

    assert_eq!(vec!["high"], installed_names(&solution));
    Ok(())
}

#[test]
fn cancellation_aborts_resolution() {
    let cancellation = Cancellation::new();
    let resolver = Resolver::new([create_test_index(vec![create_test_package(
        "foo",
        "1.0",
        vec![],
        vec![],
        vec![],
    )])])
    .with_cancellation(cancellation.clone());

    cancellation.cancel();
    let error = resolver.packages_with_dependencies(&["foo"]).unwrap_err();
    assert!(matches!(error, Error::Cancelled));
}

#[test]
fn solution_display_is_line_oriented() -> TestResult {
    let resolver = Resolver::new([create_test_index(vec![
        create_test_package("a", "1.0", vec!["!b", "c"], vec![], vec![]),
        create_test_package("b", "1.0", vec![], vec![], vec![]),
        create_test_package("c", "2.0", vec![], vec![], vec![]),
    ])]);

    let solution = resolver.packages_with_dependencies(&["a"])?;
    let rendered = format!("{solution}");

    let lines: Vec<_> = rendered.lines().collect();
    assert_eq!(3, lines.len());
    assert!(lines[0].contains("install:") && lines[0].contains("c"));
    assert!(lines[1].contains("install:") && lines[1].contains("a"));
    assert!(lines[2].contains("conflict:") && lines[2].contains("b"));
    Ok(())
}

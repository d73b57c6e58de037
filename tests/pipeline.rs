use ajax_to_fetch::{
    source, transform, transform_with_report, PrintOptions, QuoteStyle, TransformConfig,
};
use pretty_assertions::assert_eq;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn squash(code: &str) -> String {
    code.chars().filter(|c| !c.is_whitespace()).collect()
}

fn run(src: &str) -> String {
    init_tracing();
    squash(&transform(src, &TransformConfig::default()).unwrap())
}

/// What the printer alone makes of `src`.
fn normalized(src: &str) -> String {
    let unit = source::parse(src).unwrap();
    source::print(&unit, &PrintOptions::default()).unwrap()
}

#[test]
fn get_with_data_moves_into_the_url() {
    assert_eq!(
        run("$.ajax({ url: '/a', data: { id: 7 } });"),
        "fetch(`/a?${REPLACE_WITH_QUERY_STRING_TRANSFORM_AT_URL({id:7})}`)\
         .then((response)=>response.json());"
    );
}

#[test]
fn post_with_object_body_and_callbacks() {
    let src = r#"
        $.ajax({
            url: '/users/' + id,
            type: 'POST',
            data: { name: name },
            dataType: 'json',
            success: function (user) { render(user); },
            error: function (xhr) { alert(xhr.status); }
        });
    "#;
    assert_eq!(
        run(src),
        "fetch(`/users/${id}`,{method:'POST',\
         body:REPLACE_WITH_QUERY_STRING_TRANSFORM_AT_BODY({name:name}),\
         headers:{contentType:'application/x-www-form-urlencoded'}})\
         .then((response)=>response.json())\
         .then(function(user){render(user);})\
         .catch(function(xhr){alert(xhr.status);});"
    );
}

#[test]
fn cache_hints() {
    assert_eq!(
        run("jQuery.ajax({ url: u, cache: true });"),
        "fetch(u,{cache:'force-cache'}).then((response)=>response.json());"
    );
    assert_eq!(
        run("jQuery.ajax({ url: u, cache: false });"),
        "fetch(u).then((response)=>response.json());"
    );
    assert_eq!(
        run("$.ajax({ url: u, cache: flag ? a : b });"),
        "fetch(u,{cache:(flag?a:b)?'force-cache':'default'}).then((response)=>response.json());"
    );
}

#[test]
fn legacy_continuations_become_promise_methods() {
    assert_eq!(
        run("$.getJSON('/a').done(show).fail(oops);"),
        "$.getJSON('/a').then(show).catch(oops);"
    );
    assert_eq!(
        run("$.ajax({ url: '/a' }).done(show);"),
        "fetch('/a').then((response)=>response.json()).then(show);"
    );
}

#[test]
fn unrelated_done_and_fail_stay() {
    let src = "deferred.done(show).fail(oops);\nlist.filter(x).done(y);\n";
    assert_eq!(run(src), squash(&normalized(src)));
}

#[test]
fn non_object_argument_is_left_alone() {
    let src = "$.ajax(settings);\n$.ajax('/a', { type: 'POST' });\n";
    init_tracing();
    let out = transform_with_report(src, &TransformConfig::default()).unwrap();
    assert_eq!(out.code, normalized(src));
    assert_eq!(out.report.rewritten, 0);
    assert_eq!(out.report.skipped, 2);
}

#[test]
fn running_twice_changes_nothing() {
    let src = r#"
        function save(user) {
            $.ajax({
                url: '/users/' + user.id + '/profile',
                method: 'PUT',
                data: JSON.stringify(user),
                contentType: 'application/json',
                success: done
            }).fail(report);
        }
    "#;
    let cfg = TransformConfig::default();
    let once = transform(src, &cfg).unwrap();
    let twice = transform(&once, &cfg).unwrap();
    assert_eq!(twice, once);
    assert!(squash(&once).contains(
        "fetch(`/users/${user.id}/profile`,{method:'PUT',body:JSON.stringify(user),\
         headers:{contentType:'application/json'}})"
    ));
}

#[test]
fn double_quote_style() {
    let cfg = TransformConfig {
        print: PrintOptions {
            quote: QuoteStyle::Double,
            ..PrintOptions::default()
        },
        ..TransformConfig::default()
    };
    let out = transform("$.ajax({ url: u, type: 'POST', data: d });", &cfg).unwrap();
    assert!(out.contains(r#""application/x-www-form-urlencoded""#), "{out}");
}

#[test]
fn config_from_json() {
    let cfg = TransformConfig::from_json(
        r#"{ "targets": [{ "object": "$", "method": "ajax" }], "requestFn": "window.fetch" }"#,
    )
    .unwrap();
    let out = transform("$.ajax({ url: '/a' }); jQuery.ajax({ url: '/b' });", &cfg).unwrap();
    assert_eq!(
        squash(&out),
        "window.fetch('/a').then((response)=>response.json());jQuery.ajax({url:'/b'});"
    );
}

#[test]
fn comments_survive() {
    let out = transform(
        "// load the list\n$.ajax({ url: '/list', success: fill });\n",
        &TransformConfig::default(),
    )
    .unwrap();
    assert!(out.contains("// load the list"), "{out}");
}

mod common;

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::json;
use tokio::sync::Notify;

use common::{body_json, body_text, get, recorder, taken, trail, Users};
use route_mount::mount::{Mount, MountContext, Reply, Resource, Responders};
use route_mount::routing::{
    middleware, BindingKind, MethodSpec, MiddlewareChain, Next, RouteError, RouteTable, Router,
};

fn users_mount(router: &Arc<Router>, resource: Users) -> Mount {
    Mount::mount(
        MountContext::new(router.clone(), "users", "/users"),
        Arc::new(resource),
    )
    .unwrap()
}

#[tokio::test]
async fn test_attach_commits_middleware_then_responders() {
    let router = Arc::new(Router::new());
    let t = trail();
    let mount = users_mount(&router, Users::new(&t));

    let shape: Vec<_> = router
        .bindings()
        .iter()
        .map(|b| (b.path().to_string(), b.method(), b.kind(), b.owner()))
        .collect();
    assert_eq!(
        shape,
        vec![
            ("*".to_string(), MethodSpec::All, BindingKind::Middleware, Some(mount.id())),
            ("/users".to_string(), MethodSpec::Get, BindingKind::Middleware, Some(mount.id())),
            ("/users".to_string(), MethodSpec::Get, BindingKind::Responder, Some(mount.id())),
        ]
    );

    let res = router.dispatch(get("/users")).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(body_json(res).await, json!([{ "id": 1, "name": "ada" }]));
    assert_eq!(taken(&t), vec!["log", "auth", "respond"]);
}

#[tokio::test]
async fn test_detach_unhooks_primary_path_only() {
    let router = Arc::new(Router::new());
    let t = trail();
    router
        .register(MethodSpec::Get, "health", recorder(&t, "health"))
        .unwrap();
    let mount = users_mount(&router, Users::new(&t));

    assert_eq!(mount.detach(), 2);

    // The global logger is not on the primary path and stays live.
    let res = router.dispatch(get("/users")).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert_eq!(taken(&t), vec!["log"]);

    let res = router.dispatch(get("/health")).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert_eq!(taken(&t), vec!["health", "log"]);
}

#[tokio::test]
async fn test_attach_detach_attach_restores_behavior() {
    let router = Arc::new(Router::new());
    let t = trail();
    let mount = users_mount(&router, Users::new(&t));

    let first = body_json(router.dispatch(get("/users")).await).await;
    let first_trail = taken(&t);

    mount.detach();
    let report = mount.attach().unwrap();
    assert_eq!(report.bindings, 3);
    assert_eq!(report.responders, 1);
    assert_eq!(report.swept, 1);
    assert_eq!(router.len(), 3);

    let second = body_json(router.dispatch(get("/users")).await).await;
    assert_eq!(first, second);
    assert_eq!(first_trail, taken(&t));
}

#[tokio::test]
async fn test_empty_reply_falls_through() {
    struct Quiet;

    impl Resource for Quiet {
        fn routes(&self) -> Result<RouteTable, RouteError> {
            Ok(RouteTable::new().declare("quiet", MethodSpec::Get))
        }

        fn responders(&self) -> Responders {
            Responders::new().on(MethodSpec::Get, |_req: Request<Body>| async {
                Reply::payload(json!(""))
            })
        }
    }

    let router = Arc::new(Router::new());
    let t = trail();
    Mount::mount(
        MountContext::new(router.clone(), "quiet", "quiet"),
        Arc::new(Quiet),
    )
    .unwrap();
    router
        .register(MethodSpec::Get, "quiet", recorder(&t, "after"))
        .unwrap();

    let res = router.dispatch(get("/quiet")).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert_eq!(taken(&t), vec!["after"]);
}

#[tokio::test]
async fn test_payload_reply_ends_chain() {
    let router = Arc::new(Router::new());
    let t = trail();
    let mut users = Users::new(&t);
    users.payload = json!("plain text");
    users_mount(&router, users);
    router
        .register(MethodSpec::Get, "users", recorder(&t, "after"))
        .unwrap();

    let res = router.dispatch(get("/users/")).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(body_text(res).await, "plain text");
    assert_eq!(taken(&t), vec!["log", "auth", "respond"]);
}

#[tokio::test]
async fn test_responder_without_declared_method_is_not_wired() {
    struct PostOnly;

    impl Resource for PostOnly {
        fn routes(&self) -> Result<RouteTable, RouteError> {
            Ok(RouteTable::new().declare("things", MethodSpec::Get))
        }

        fn responders(&self) -> Responders {
            Responders::new().on(MethodSpec::Post, |_req: Request<Body>| async {
                Reply::payload(json!({ "created": true }))
            })
        }
    }

    let router = Arc::new(Router::new());
    let report = Mount::new(
        MountContext::new(router.clone(), "things", "things"),
        Arc::new(PostOnly),
    )
    .unwrap()
    .attach()
    .unwrap();
    assert_eq!(report.bindings, 0);
    assert!(router.is_empty());
}

#[tokio::test]
async fn test_in_flight_request_keeps_its_snapshot() {
    struct Gated {
        entered: Arc<Notify>,
        release: Arc<Notify>,
    }

    impl Resource for Gated {
        fn routes(&self) -> Result<RouteTable, RouteError> {
            let entered = self.entered.clone();
            let release = self.release.clone();
            let gate = middleware(move |req: Request<Body>, next: Next| {
                let entered = entered.clone();
                let release = release.clone();
                async move {
                    entered.notify_one();
                    release.notified().await;
                    next.run(req).await
                }
            });
            Ok(RouteTable::new().route(
                "slow",
                MethodSpec::Get,
                MiddlewareChain::new().with_shared(gate),
            ))
        }

        fn responders(&self) -> Responders {
            Responders::new().on(MethodSpec::Get, |_req: Request<Body>| async {
                Reply::payload(json!({ "done": true }))
            })
        }
    }

    let entered = Arc::new(Notify::new());
    let release = Arc::new(Notify::new());
    let router = Arc::new(Router::new());
    let mount = Mount::mount(
        MountContext::new(router.clone(), "slow", "slow"),
        Arc::new(Gated {
            entered: entered.clone(),
            release: release.clone(),
        }),
    )
    .unwrap();

    let in_flight = {
        let router = router.clone();
        tokio::spawn(async move { router.dispatch(get("/slow")).await })
    };
    entered.notified().await;
    assert_eq!(mount.detach(), 2);
    release.notify_one();

    let res = in_flight.await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(body_json(res).await, json!({ "done": true }));

    // New requests see the detached stack.
    let res = router.dispatch(get("/slow")).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_two_mounts_share_a_path_independently() {
    let router = Arc::new(Router::new());
    let a = trail();
    let b = trail();
    let first = users_mount(&router, Users::new(&a));
    let _second = users_mount(&router, Users::new(&b));
    assert_eq!(router.len(), 6);

    assert_eq!(first.detach(), 2);
    assert_eq!(router.len(), 4);

    let res = router.dispatch(get("/users")).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(taken(&a), vec!["log"]);
    assert_eq!(taken(&b), vec!["log", "auth", "respond"]);
}

#[tokio::test]
async fn test_reattach_keeps_global_precedence_for_other_resources() {
    struct Other {
        trail: common::Trail,
    }

    impl Resource for Other {
        fn routes(&self) -> Result<RouteTable, RouteError> {
            Ok(RouteTable::new().route(
                "other",
                MethodSpec::Get,
                MiddlewareChain::new().with_shared(recorder(&self.trail, "other")),
            ))
        }
    }

    let router = Arc::new(Router::new());
    let t = trail();
    let users = users_mount(&router, Users::new(&t));
    Mount::mount(
        MountContext::new(router.clone(), "other", "other"),
        Arc::new(Other { trail: t.clone() }),
    )
    .unwrap();

    router.dispatch(get("/other")).await;
    let before = taken(&t);
    assert_eq!(before, vec!["log", "other"]);

    users.detach();
    users.attach().unwrap();

    router.dispatch(get("/other")).await;
    assert_eq!(taken(&t), before);

    let paths: Vec<_> = router.bindings().iter().map(|b| b.path().to_string()).collect();
    assert_eq!(paths, vec!["*", "/users", "/users", "/other"]);
}

#[tokio::test]
async fn test_sent_reply_is_not_sent_twice() {
    struct Creates;

    impl Resource for Creates {
        fn routes(&self) -> Result<RouteTable, RouteError> {
            Ok(RouteTable::new().declare("things", MethodSpec::Post))
        }

        fn responders(&self) -> Responders {
            Responders::new().on(MethodSpec::Post, |_req: Request<Body>| async {
                Reply::sent((StatusCode::CREATED, "x"))
            })
        }
    }

    let router = Arc::new(Router::new());
    let t = trail();
    Mount::mount(
        MountContext::new(router.clone(), "things", "things"),
        Arc::new(Creates),
    )
    .unwrap();
    router
        .register(MethodSpec::Post, "things", recorder(&t, "after"))
        .unwrap();

    let res = router
        .dispatch(Request::post("/things").body(Body::empty()).unwrap())
        .await;
    assert_eq!(res.status(), StatusCode::CREATED);
    assert_eq!(body_text(res).await, "x");
    assert!(taken(&t).is_empty());
}

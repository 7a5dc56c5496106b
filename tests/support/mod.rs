// In-process stub battle server shared by every test in a binary.
use axum::{
    Json, Router,
    extract::Path,
    http::StatusCode,
    routing::post,
};
use serde_json::{Value, json};
use std::{
    collections::HashMap,
    // `OnceLock` writes a value only once; `Mutex` guards the battle table.
    sync::{Arc, Mutex, OnceLock},
    time::Duration,
};

// Damage every fight plan deals in the stub resolver.
pub const FIGHT_DAMAGE: u32 = 7;
// Enemy name that makes the first resolve of a battle answer 503.
pub const FLAKY_ENEMY: &str = "Flaky";
// Enemy names that make every snapshot of their battle malformed:
// one reports hp above max_hp, the other drops the `logs` key.
pub const OVERHEALED_ENEMY: &str = "Overhealed";
pub const FORGETFUL_ENEMY: &str = "Forgetful";

#[derive(Debug, Clone)]
struct StubCombatant {
    name: String,
    hp: u32,
    max_hp: u32,
}

#[derive(Debug, Default)]
struct StubBattle {
    party: Vec<StubCombatant>,
    enemies: Vec<StubCombatant>,
    logs: Vec<String>,
    plans: Vec<Value>,
    // Endpoint names in call order: "start", "plan:<actor>", "resolve".
    calls: Vec<String>,
    fail_next_resolve: bool,
}

impl StubBattle {
    fn new(enemy_names: Vec<String>) -> Self {
        let enemies: Vec<StubCombatant> = enemy_names
            .into_iter()
            .map(|name| StubCombatant {
                name,
                hp: 12,
                max_hp: 12,
            })
            .collect();
        let fail_next_resolve = enemies.iter().any(|enemy| enemy.name == FLAKY_ENEMY);
        Self {
            party: vec![
                StubCombatant {
                    name: "Firion".to_string(),
                    hp: 35,
                    max_hp: 35,
                },
                StubCombatant {
                    name: "Maria".to_string(),
                    hp: 28,
                    max_hp: 28,
                },
            ],
            enemies,
            logs: vec!["Battle start!".to_string()],
            fail_next_resolve,
            ..Self::default()
        }
    }

    fn has_enemy(&self, name: &str) -> bool {
        self.enemies.iter().any(|enemy| enemy.name == name)
    }

    fn state(&self) -> Value {
        let overhealed = self.has_enemy(OVERHEALED_ENEMY);
        let side = |members: &[StubCombatant]| {
            members
                .iter()
                .map(|c| {
                    let hp = if overhealed { c.max_hp + 5 } else { c.hp };
                    json!({ "name": c.name, "hp": hp, "max_hp": c.max_hp })
                })
                .collect::<Vec<_>>()
        };
        let mut state = json!({
            "party": side(&self.party),
            "enemies": side(&self.enemies),
            "logs": self.logs,
        });
        if self.has_enemy(FORGETFUL_ENEMY)
            && let Some(fields) = state.as_object_mut()
        {
            fields.remove("logs");
        }
        state
    }
}

type Battles = Arc<Mutex<HashMap<String, StubBattle>>>;

static BATTLES: OnceLock<Battles> = OnceLock::new();
static SERVER_URL: OnceLock<String> = OnceLock::new();
static SERVER_READY: OnceLock<()> = OnceLock::new();

fn battles() -> &'static Battles {
    BATTLES.get_or_init(|| Arc::new(Mutex::new(HashMap::new())))
}

fn unknown_battle() -> (StatusCode, Json<Value>) {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "message": "unknown battle" })),
    )
}

fn insert_battle(battle: StubBattle) -> String {
    let battle_id = uuid::Uuid::new_v4().to_string();
    battles()
        .lock()
        .expect("battles mutex poisoned")
        .insert(battle_id.clone(), battle);
    battle_id
}

async fn start_battle(Json(body): Json<Value>) -> Json<Value> {
    let enemy_names = body["enemy_names"]
        .as_array()
        .map(|names| {
            names
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect::<Vec<_>>()
        })
        .unwrap_or_default();
    let mut battle = StubBattle::new(enemy_names);
    battle.calls.push("start".to_string());

    let state = battle.state();
    let battle_id = insert_battle(battle);
    Json(json!({ "battle_id": battle_id, "state": state }))
}

async fn submit_plan(
    Path(battle_id): Path<String>,
    Json(plan): Json<Value>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let mut guard = battles().lock().expect("battles mutex poisoned");
    let battle = guard.get_mut(&battle_id).ok_or_else(unknown_battle)?;
    battle.calls.push(format!("plan:{}", plan["actor_index"]));
    battle.plans.push(plan);
    Ok(Json(json!({ "ok": true })))
}

async fn resolve_round(
    Path(battle_id): Path<String>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let mut guard = battles().lock().expect("battles mutex poisoned");
    let battle = guard.get_mut(&battle_id).ok_or_else(unknown_battle)?;
    if battle.fail_next_resolve {
        battle.fail_next_resolve = false;
        return Err((
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "error": "resolver busy" })),
        ));
    }

    battle.calls.push("resolve".to_string());
    for plan in std::mem::take(&mut battle.plans) {
        let actor = plan["actor_index"].as_u64().unwrap_or(0) as usize;
        let target = plan["target_index"].as_u64().unwrap_or(0) as usize;
        if plan["kind"] != "fight" || plan["target_side"] != "enemy" {
            continue;
        }
        let actor_name = battle.party[actor].name.clone();
        let enemy = &mut battle.enemies[target];
        enemy.hp = enemy.hp.saturating_sub(FIGHT_DAMAGE);
        battle
            .logs
            .push(format!("{actor_name} attacks {} for {FIGHT_DAMAGE}.", enemy.name));
    }
    Ok(Json(json!({ "state": battle.state() })))
}

fn app() -> Router {
    Router::new()
        .route("/api/battle/start", post(start_battle))
        .route("/api/battle/{battle_id}/plan", post(submit_plan))
        .route("/api/battle/{battle_id}/resolve", post(resolve_round))
}

// Endpoint calls the stub has seen for a battle, in order.
pub fn calls(battle_id: &str) -> Vec<String> {
    battles()
        .lock()
        .expect("battles mutex poisoned")
        .get(battle_id)
        .map(|battle| battle.calls.clone())
        .unwrap_or_default()
}

// Registers a battle without going through HTTP, for calls that need an id
// the client could not obtain itself.
#[allow(dead_code)]
pub fn seed_battle(enemy_names: &[&str]) -> String {
    let names = enemy_names.iter().map(|name| name.to_string()).collect();
    insert_battle(StubBattle::new(names))
}

// Starts the stub once per test binary and returns its base URL.
pub fn ensure_server() -> &'static str {
    SERVER_READY.get_or_init(|| {
        // The serving thread hands its bound address back over this channel.
        let (addr_tx, addr_rx) = std::sync::mpsc::channel::<std::net::SocketAddr>();
        // A plain OS thread with its own runtime outlives each `#[tokio::test]` runtime.
        std::thread::spawn(move || {
            let runtime = tokio::runtime::Runtime::new().expect("stub runtime");
            runtime.block_on(async move {
                // Port 0 lets the OS pick, so a real battle server on 3000 is never hit.
                let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
                    .await
                    .expect("bind stub port");
                let addr = listener.local_addr().expect("stub local addr");
                let _ = addr_tx.send(addr);
                axum::serve(listener, app()).await.expect("stub server failed");
            });
        });

        // Blocks until the thread has bound, or fails if it died first.
        let addr = addr_rx
            .recv_timeout(Duration::from_secs(5))
            .expect("stub server never reported its address");
        let _ = SERVER_URL.set(format!("http://{addr}"));
        wait_until_accepting(addr);
    });

    SERVER_URL.get().expect("stub url published").as_str()
}

// Polls with plain TCP connects; a bound listener may not be serving yet.
fn wait_until_accepting(addr: std::net::SocketAddr) {
    let deadline = std::time::Instant::now() + Duration::from_secs(2);
    while std::time::Instant::now() < deadline {
        if std::net::TcpStream::connect(addr).is_ok() {
            return;
        }
        std::thread::sleep(Duration::from_millis(20));
    }
    panic!("stub battle server at {addr} refused connections for 2s");
}

// Address nothing listens on: bind an ephemeral port, then release it.
#[allow(dead_code)]
pub fn closed_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind ephemeral port");
    let addr = listener.local_addr().expect("get local addr");
    drop(listener);
    format!("http://{addr}")
}

// Address that accepts connections and never answers, holding every socket open.
#[allow(dead_code)]
pub fn silent_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind ephemeral port");
    let addr = listener.local_addr().expect("get local addr");
    std::thread::spawn(move || {
        let mut held = Vec::new();
        for stream in listener.incoming().flatten() {
            held.push(stream);
        }
    });
    format!("http://{addr}")
}

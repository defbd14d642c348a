#[cfg(test)]
pub mod mock {
    use crate::api::client::{register_mock, MockResponse, TestResponder};
    use crate::api::ApiError;
    use reqwest::Method;
    use serde_json::{json, Value};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    pub const GET: Method = Method::GET;
    pub const POST: Method = Method::POST;
    pub const DELETE: Method = Method::DELETE;

    static NEXT_ID: AtomicUsize = AtomicUsize::new(1);

    fn next_base() -> String {
        let id = NEXT_ID.fetch_add(1, Ordering::Relaxed);
        format!("http://mock-{}", id)
    }

    fn json_body(request: &reqwest::Request) -> Value {
        request
            .body()
            .and_then(|b| b.as_bytes())
            .and_then(|bytes| serde_json::from_slice::<Value>(bytes).ok())
            .unwrap_or(Value::Null)
    }

    fn request_line(request: &reqwest::Request) -> String {
        let url = request.url();
        match url.query() {
            Some(query) => format!("{} {}?{}", request.method(), url.path(), query),
            None => format!("{} {}", request.method(), url.path()),
        }
    }

    #[derive(Clone)]
    pub struct MockServer {
        inner: Arc<Mutex<Inner>>,
        base: String,
    }

    struct Inner {
        routes: Vec<Route>,
        received: Vec<String>,
    }

    #[derive(Clone)]
    struct Route {
        method: Method,
        path: String,
        query: Vec<(String, String)>,
        response: MockResponse,
    }

    impl Route {
        fn matches(&self, request: &reqwest::Request) -> bool {
            if self.method != *request.method() || self.path != request.url().path() {
                return false;
            }
            let pairs: Vec<(String, String)> = request
                .url()
                .query_pairs()
                .map(|(k, v)| (k.into_owned(), v.into_owned()))
                .collect();
            self.query.iter().all(|wanted| pairs.contains(wanted))
        }
    }

    impl MockServer {
        pub fn start() -> Self {
            let server = Self {
                inner: Arc::new(Mutex::new(Inner {
                    routes: Vec::new(),
                    received: Vec::new(),
                })),
                base: next_base(),
            };
            register_mock(format!("{}/", server.base), Arc::new(server.clone()));
            server
        }

        pub fn url(&self, path: &str) -> String {
            format!("{}{}", self.base, path)
        }

        /// Later registrations win over earlier ones for the same request.
        pub fn mock<F>(&self, f: F)
        where
            F: FnOnce(&mut When, &mut Then),
        {
            let mut when = When::default();
            let mut then = Then::default();
            f(&mut when, &mut then);

            let method = when.method.clone().expect("mock requires method");
            let path = when.path.clone().expect("mock requires path");
            let status = then.status.unwrap_or(200);
            let response = match then.body {
                Some(body) => MockResponse::json(status, body),
                None if status == 204 => MockResponse::empty(status),
                None => MockResponse::json(status, json!({})),
            };

            let mut inner = self.inner.lock().expect("mock lock");
            inner.routes.push(Route {
                method,
                path,
                query: when.query,
                response,
            });
        }

        /// Request lines (`METHOD /path?query`) in arrival order.
        pub fn received(&self) -> Vec<String> {
            self.inner.lock().expect("mock lock").received.clone()
        }
    }

    impl TestResponder for MockServer {
        fn respond(&self, request: &reqwest::Request) -> Result<MockResponse, ApiError> {
            let mut inner = self.inner.lock().map_err(|_| ApiError::request_failed("mock lock"))?;
            inner.received.push(request_line(request));

            let route = inner
                .routes
                .iter()
                .rev()
                .find(|route| route.matches(request))
                .cloned();

            route.map(|route| route.response).ok_or_else(|| {
                ApiError::request_failed(format!(
                    "No mock for {} {}",
                    request.method(),
                    request.url()
                ))
            })
        }
    }

    #[derive(Default)]
    pub struct When {
        method: Option<Method>,
        path: Option<String>,
        query: Vec<(String, String)>,
    }

    impl When {
        pub fn method(&mut self, method: Method) -> &mut Self {
            self.method = Some(method);
            self
        }

        pub fn path(&mut self, path: &str) -> &mut Self {
            self.path = Some(path.to_string());
            self
        }

        pub fn query_param(&mut self, name: &str, value: &str) -> &mut Self {
            self.query.push((name.to_string(), value.to_string()));
            self
        }
    }

    #[derive(Default)]
    pub struct Then {
        status: Option<u16>,
        body: Option<Value>,
    }

    impl Then {
        pub fn status(&mut self, status: u16) -> &mut Self {
            self.status = Some(status);
            self
        }

        pub fn json_body(&mut self, body: Value) -> &mut Self {
            self.body = Some(body);
            self
        }
    }

    /// In-memory stand-in for the roster service. Enforces one attendance
    /// record per employee and date, and cascades employee deletes.
    #[derive(Clone)]
    pub struct FakeRosterService {
        state: Arc<Mutex<RosterState>>,
        base: String,
    }

    struct RosterState {
        employees: Vec<Value>,
        attendance: Vec<Value>,
        next_id: i64,
        received: Vec<String>,
    }

    impl FakeRosterService {
        pub fn start() -> Self {
            let service = Self {
                state: Arc::new(Mutex::new(RosterState {
                    employees: Vec::new(),
                    attendance: Vec::new(),
                    next_id: 1,
                    received: Vec::new(),
                })),
                base: next_base(),
            };
            register_mock(format!("{}/", service.base), Arc::new(service.clone()));
            service
        }

        pub fn api_url(&self) -> String {
            format!("{}/api/", self.base)
        }

        pub fn add_employee(&self, employee_id: &str, full_name: &str, department: &str) -> i64 {
            let mut state = self.state.lock().expect("roster lock");
            let id = state.next_id;
            state.next_id += 1;
            state.employees.push(json!({
                "id": id,
                "employee_id": employee_id,
                "full_name": full_name,
                "email": format!("{}@example.com", employee_id.to_lowercase()),
                "department": department,
                "present_days": 0
            }));
            id
        }

        pub fn attendance_count(&self) -> usize {
            self.state.lock().expect("roster lock").attendance.len()
        }

        pub fn received(&self) -> Vec<String> {
            self.state.lock().expect("roster lock").received.clone()
        }

        fn envelope(results: Vec<Value>) -> MockResponse {
            MockResponse::json(
                200,
                json!({
                    "count": results.len(),
                    "next": null,
                    "previous": null,
                    "results": results
                }),
            )
        }

        fn create_employee(state: &mut RosterState, body: Value) -> MockResponse {
            let mut errors = serde_json::Map::new();
            for field in ["employee_id", "full_name", "email", "department"] {
                let blank = body
                    .get(field)
                    .and_then(Value::as_str)
                    .map_or(true, |v| v.trim().is_empty());
                if blank {
                    errors.insert(field.into(), json!(["This field is required."]));
                }
            }
            let taken = |key: &str| {
                body.get(key).is_some_and(|value| {
                    state.employees.iter().any(|e| e.get(key) == Some(value))
                })
            };
            if taken("employee_id") {
                errors.insert("employee_id".into(), json!(["Employee ID already exists."]));
            }
            if taken("email") {
                errors.insert("email".into(), json!(["Email already exists."]));
            }
            if !errors.is_empty() {
                return MockResponse::json(400, Value::Object(errors));
            }
            let id = state.next_id;
            state.next_id += 1;
            let mut employee = body;
            employee["id"] = json!(id);
            employee["present_days"] = json!(0);
            state.employees.push(employee.clone());
            MockResponse::json(201, employee)
        }

        fn mark(state: &mut RosterState, body: Value) -> MockResponse {
            let employee = body.get("employee").cloned().unwrap_or(Value::Null);
            let date = body.get("date").cloned().unwrap_or(Value::Null);
            let owner = state
                .employees
                .iter()
                .find(|e| e.get("id") == Some(&employee))
                .cloned();
            let Some(owner) = owner else {
                return MockResponse::json(
                    400,
                    json!({ "employee": [format!("Invalid pk \"{}\" - object does not exist.", employee)] }),
                );
            };
            let duplicate = state
                .attendance
                .iter()
                .any(|r| r.get("employee") == Some(&employee) && r.get("date") == Some(&date));
            if duplicate {
                return MockResponse::json(
                    400,
                    json!({
                        "non_field_errors": ["Attendance already marked for this employee on this date."]
                    }),
                );
            }
            let id = state.next_id;
            state.next_id += 1;
            let record = json!({
                "id": id,
                "employee": employee,
                "employee_name": owner["full_name"],
                "employee_code": owner["employee_id"],
                "date": date,
                "status": body.get("status").cloned().unwrap_or(Value::Null)
            });
            state.attendance.push(record.clone());
            MockResponse::json(201, record)
        }
    }

    impl TestResponder for FakeRosterService {
        fn respond(&self, request: &reqwest::Request) -> Result<MockResponse, ApiError> {
            let mut state = self
                .state
                .lock()
                .map_err(|_| ApiError::request_failed("roster lock"))?;
            state.received.push(request_line(request));

            let path = request.url().path().to_string();
            let method = request.method().as_str().to_string();
            match (method.as_str(), path.as_str()) {
                ("GET", "/api/employees/") => Ok(Self::envelope(state.employees.clone())),
                ("GET", "/api/attendance/") => {
                    let date = request
                        .url()
                        .query_pairs()
                        .find(|(k, _)| k == "date")
                        .map(|(_, v)| v.into_owned());
                    let mut records: Vec<Value> = state
                        .attendance
                        .iter()
                        .filter(|r| match &date {
                            Some(date) => r.get("date").and_then(Value::as_str) == Some(date.as_str()),
                            None => true,
                        })
                        .cloned()
                        .collect();
                    records.reverse();
                    Ok(Self::envelope(records))
                }
                ("POST", "/api/attendance/") => Ok(Self::mark(&mut state, json_body(request))),
                ("POST", "/api/employees/") => {
                    Ok(Self::create_employee(&mut state, json_body(request)))
                }
                ("DELETE", p) if p.starts_with("/api/employees/") => {
                    let raw = p
                        .trim_start_matches("/api/employees/")
                        .trim_end_matches('/');
                    let id: Value = raw
                        .parse::<i64>()
                        .map(Value::from)
                        .unwrap_or_else(|_| Value::from(raw));
                    let before = state.employees.len();
                    state.employees.retain(|e| e.get("id") != Some(&id));
                    if state.employees.len() == before {
                        return Ok(MockResponse::json(404, json!({ "detail": "Not found." })));
                    }
                    state.attendance.retain(|r| r.get("employee") != Some(&id));
                    Ok(MockResponse::empty(204))
                }
                (method, path) => Err(ApiError::request_failed(format!(
                    "No fake route for {} {}",
                    method, path
                ))),
            }
        }
    }
}

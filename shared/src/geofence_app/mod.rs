pub mod view_types;
use std::collections::BTreeSet;

use compact_str::{CompactString, format_compact};
use crux_core::{
    App,
    macros::effect,
    render::{RenderOperation, render},
};
use crux_geofencing::{
    GeofenceError, GeofenceOperation, GeofenceResult, Geofencing, Region, RegionId,
};
use serde::{Deserialize, Serialize};
use view_types::ViewModel;

type Command = crux_core::Command<Effect, Event>;

/// An event from the shell. Either a user interaction or the answer to a request from the app.
///
/// Events marked with `#[serde(skip)]` are created by the app itself and never sent by the shell.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub enum Event {
    /// Ask for the permissions needed for geofencing.
    RequestPermissions,
    #[serde(skip)]
    PermissionsResolved(GeofenceResult<()>),

    /// Start monitoring a circular region. The radius is in meters.
    StartMonitoring {
        identifier: CompactString,
        latitude: f64,
        longitude: f64,
        radius: f64,
    },
    #[serde(skip)]
    MonitoringStarted {
        id: RegionId,
        res: GeofenceResult<()>,
    },

    /// Stop monitoring a region by its identifier.
    StopMonitoring(CompactString),
    #[serde(skip)]
    MonitoringStopped {
        id: RegionId,
        res: GeofenceResult<()>,
    },

    /// Stop monitoring all regions.
    StopMonitoringAll,
    #[serde(skip)]
    AllMonitoringStopped(GeofenceResult<()>),
}

/// All the possible side effects of the application.
///
/// If you port this application to a new platform, you need to implement these effects.
#[effect(typegen)]
pub enum Effect {
    Render(RenderOperation),
    Geofencing(GeofenceOperation),
}

/// What the app knows about the location permissions.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, derive_more::Display,
)]
pub enum PermissionStatus {
    /// Permissions haven't been requested yet in this session.
    #[default]
    #[display("Unknown")]
    Unknown,
    #[display("Granted")]
    Granted,
    #[display("Denied")]
    Denied,
    #[display("Not requested")]
    NotRequested,
}

/// The state of the application.
#[derive(Default)]
pub struct Model {
    permission: PermissionStatus,
    /// Regions the native layer has accepted and which haven't been stopped since.
    monitored: BTreeSet<RegionId>,
    /// A message that should be viewed to the user.
    msg: CompactString,
}

#[derive(Default)]
pub struct GeofenceApp;

impl App for GeofenceApp {
    type Event = Event;
    type Model = Model;
    type ViewModel = ViewModel;
    type Effect = Effect;
    type Capabilities = (); // FIXME: Depricated and will be removed.

    fn update(
        &self,
        event: Self::Event,
        model: &mut Self::Model,
        _: &Self::Capabilities, // Deprecated argument
    ) -> Command {
        update(model, event).then(render())
    }

    fn view(&self, model: &Self::Model) -> Self::ViewModel {
        ViewModel::make(model)
    }
}

fn update(model: &mut Model, event: Event) -> Command {
    match event {
        Event::RequestPermissions => {
            Geofencing::request_permissions().then_send(Event::PermissionsResolved)
        }
        Event::PermissionsResolved(res) => {
            match res {
                Ok(()) => {
                    model.permission = PermissionStatus::Granted;
                    model.msg = "Location permissions granted.".into();
                }
                Err(e) => {
                    match e {
                        GeofenceError::PermissionDenied => {
                            model.permission = PermissionStatus::Denied;
                        }
                        GeofenceError::PermissionNotRequested => {
                            model.permission = PermissionStatus::NotRequested;
                        }
                        _ => (),
                    }
                    model.msg = format_compact!("Error: {e}");
                }
            }
            Command::done()
        }

        Event::StartMonitoring {
            identifier,
            latitude,
            longitude,
            radius,
        } => match Region::new(identifier.as_str(), latitude, longitude, radius) {
            Ok(region) => {
                let id = region.id().clone();
                Geofencing::start_monitoring_region(region)
                    .then_send(move |res| Event::MonitoringStarted { id, res })
            }
            Err(e) => {
                // Invalid input never reaches the native layer.
                tracing::debug!(%identifier, error = %e, "Rejected region");
                model.msg = format_compact!("Error: {e}");
                Command::done()
            }
        },
        Event::MonitoringStarted { id, res } => {
            match res {
                Ok(()) => {
                    model.msg = format_compact!("Monitoring {id}.");
                    model.monitored.insert(id);
                }
                Err(e) => model.msg = format_compact!("Error: Could not monitor {id}: {e}"),
            }
            Command::done()
        }

        Event::StopMonitoring(identifier) => match RegionId::new(identifier.as_str()) {
            Ok(id) => Geofencing::stop_monitoring_region(id.clone())
                .then_send(move |res| Event::MonitoringStopped { id, res }),
            Err(e) => {
                model.msg = format_compact!("Error: {e}");
                Command::done()
            }
        },
        Event::MonitoringStopped { id, res } => {
            match res {
                Ok(()) => {
                    model.monitored.remove(&id);
                    model.msg = format_compact!("Stopped monitoring {id}.");
                }
                Err(e @ GeofenceError::UnknownIdentifier { .. }) => {
                    // The native layer doesn't know the region, so it isn't monitored.
                    model.monitored.remove(&id);
                    model.msg = format_compact!("Error: {e}");
                }
                Err(e) => model.msg = format_compact!("Error: Could not stop {id}: {e}"),
            }
            Command::done()
        }

        Event::StopMonitoringAll => {
            Geofencing::stop_monitoring_all_regions().then_send(Event::AllMonitoringStopped)
        }
        Event::AllMonitoringStopped(res) => {
            match res {
                Ok(()) => {
                    model.monitored.clear();
                    model.msg = "Stopped monitoring all regions.".into();
                }
                Err(e) => model.msg = format_compact!("Error: {e}"),
            }
            Command::done()
        }
    }
}

#[cfg(test)]
mod tests {
    use crux_core::Request;
    use crux_geofencing::{GeofenceResponse, GeofencingShell, StubBridge};
    use futures::executor::block_on;

    use super::*;

    /// Run an event and return the geofencing request it sent, if any.
    fn send(
        app: &GeofenceApp,
        model: &mut Model,
        event: Event,
    ) -> (Command, Option<Request<GeofenceOperation>>) {
        let mut cmd = app.update(event, model, &());
        let request = cmd.effects().find_map(|effect| match effect {
            Effect::Geofencing(request) => Some(request),
            Effect::Render(_) => None,
        });
        (cmd, request)
    }

    /// Resolve a request and feed the resulting event back to the app.
    fn resolve(
        app: &GeofenceApp,
        model: &mut Model,
        mut cmd: Command,
        mut request: Request<GeofenceOperation>,
        response: GeofenceResponse,
    ) {
        request.resolve(response).unwrap();
        let events = cmd.events().collect::<Vec<_>>();
        assert_eq!(events.len(), 1);
        for event in events {
            let _ = app.update(event, model, &());
        }
    }

    fn start(identifier: &str) -> Event {
        Event::StartMonitoring {
            identifier: identifier.into(),
            latitude: 37.0,
            longitude: -122.0,
            radius: 100.0,
        }
    }

    #[test]
    fn permissions_granted() {
        let app = GeofenceApp;
        let mut model = Model::default();

        let (cmd, request) = send(&app, &mut model, Event::RequestPermissions);
        let request = request.unwrap();
        assert_eq!(request.operation, GeofenceOperation::RequestPermissions);
        resolve(&app, &mut model, cmd, request, GeofenceResponse::Success);

        assert_eq!(model.permission, PermissionStatus::Granted);
        assert_eq!(app.view(&model).permission, "Granted");
        assert_eq!(PermissionStatus::default().to_string(), "Unknown");
    }

    #[test]
    fn permissions_denied_and_not_requested() {
        let app = GeofenceApp;

        for (error, status, label) in [
            (
                GeofenceError::PermissionDenied,
                PermissionStatus::Denied,
                "Denied",
            ),
            (
                GeofenceError::PermissionNotRequested,
                PermissionStatus::NotRequested,
                "Not requested",
            ),
        ] {
            let mut model = Model::default();
            let (cmd, request) = send(&app, &mut model, Event::RequestPermissions);
            resolve(
                &app,
                &mut model,
                cmd,
                request.unwrap(),
                GeofenceResponse::Failure(error),
            );
            assert_eq!(model.permission, status);
            assert_eq!(app.view(&model).permission, label);
        }
    }

    #[test]
    fn start_and_stop_monitoring() {
        let app = GeofenceApp;
        let mut model = Model::default();

        let (cmd, request) = send(&app, &mut model, start("home"));
        let request = request.unwrap();
        assert_eq!(
            request.operation,
            GeofenceOperation::StartMonitoringRegion(
                Region::new("home", 37.0, -122.0, 100.0).unwrap()
            )
        );
        resolve(&app, &mut model, cmd, request, GeofenceResponse::Success);
        assert_eq!(app.view(&model).monitored, vec!["home"]);

        let (cmd, request) = send(&app, &mut model, Event::StopMonitoring("home".into()));
        let request = request.unwrap();
        assert_eq!(
            request.operation,
            GeofenceOperation::StopMonitoringRegion(RegionId::new("home").unwrap())
        );
        resolve(&app, &mut model, cmd, request, GeofenceResponse::Success);
        assert!(app.view(&model).monitored.is_empty());
    }

    #[test]
    fn rejected_registration_is_not_monitored() {
        let app = GeofenceApp;
        let mut model = Model::default();

        let (cmd, request) = send(&app, &mut model, start("home"));
        let failure = GeofenceError::RegistrationFailed {
            reason: "limit reached".to_string(),
        };
        resolve(
            &app,
            &mut model,
            cmd,
            request.unwrap(),
            GeofenceResponse::Failure(failure),
        );

        let view = app.view(&model);
        assert!(view.monitored.is_empty());
        assert!(view.msg.contains("limit reached"), "{}", view.msg);
    }

    #[test]
    fn invalid_region_is_not_sent() {
        let app = GeofenceApp;
        let mut model = Model::default();

        let invalid = [
            start(""),
            Event::StartMonitoring {
                identifier: "home".into(),
                latitude: 91.0,
                longitude: 0.0,
                radius: 10.0,
            },
            Event::StartMonitoring {
                identifier: "home".into(),
                latitude: 0.0,
                longitude: 0.0,
                radius: -10.0,
            },
            Event::StopMonitoring("  ".into()),
        ];
        for event in invalid {
            let (_, request) = send(&app, &mut model, event);
            assert!(request.is_none());
            assert!(model.msg.starts_with("Error"), "{}", model.msg);
        }
    }

    #[test]
    fn stopping_unknown_region_forgets_it() {
        let app = GeofenceApp;
        let mut model = Model::default();
        model.monitored.insert(RegionId::new("gone").unwrap());

        let (cmd, request) = send(&app, &mut model, Event::StopMonitoring("gone".into()));
        let failure = GeofenceError::UnknownIdentifier {
            identifier: "gone".to_string(),
        };
        resolve(
            &app,
            &mut model,
            cmd,
            request.unwrap(),
            GeofenceResponse::Failure(failure),
        );
        assert!(model.monitored.is_empty());
    }

    #[test]
    fn stop_all_clears_monitored_regions() {
        let app = GeofenceApp;
        let mut model = Model::default();
        model.monitored.insert(RegionId::new("a").unwrap());
        model.monitored.insert(RegionId::new("b").unwrap());

        let (cmd, request) = send(&app, &mut model, Event::StopMonitoringAll);
        let request = request.unwrap();
        assert_eq!(request.operation, GeofenceOperation::StopMonitoringAllRegions);
        resolve(&app, &mut model, cmd, request, GeofenceResponse::Success);
        assert!(model.monitored.is_empty());
    }

    #[test]
    fn shell_dispatch_resolves_app_requests() {
        let app = GeofenceApp;
        let mut model = Model::default();
        let shell = GeofencingShell::new(StubBridge);

        let (cmd, request) = send(&app, &mut model, start("home"));
        let request = request.unwrap();
        let response = block_on(shell.dispatch(&request.operation));
        resolve(&app, &mut model, cmd, request, response);

        assert!(model.monitored.is_empty());
        assert!(model.msg.contains("not available"), "{}", model.msg);
    }

    #[test]
    fn events_from_the_shell_deserialize() {
        let json = r#"{"StartMonitoring":{
            "identifier": "home", "latitude": 37.0, "longitude": -122.0, "radius": 100.0
        }}"#;
        let event: Event = serde_json::from_str(json).unwrap();
        assert_eq!(event, start("home"));
    }

    #[cfg(feature = "typegen")]
    #[test]
    fn app_types_can_be_traced() {
        use crux_core::typegen::TypeGen;

        let mut typegen = TypeGen::new();
        typegen
            .register_app::<GeofenceApp>()
            .expect("the app's types are traceable");
    }
}

mod common;

use std::time::Instant;

use common::{fixture_graph, june, GraphBuilder};
use skyroute_lib::{
    cheapest_direct_flight, cheapest_route, fastest_route, plan_route, resolve_place, CancelFlag,
    Error, FlightGraph, RouteQuery, RouteRequest, SearchLimits,
};

fn carriers(itinerary: &skyroute_lib::Itinerary) -> Vec<&str> {
    itinerary
        .flights
        .iter()
        .map(|flight| flight.carrier.as_str())
        .collect()
}

#[test]
fn cheapest_direct_prefers_earliest_departure_on_tie() {
    let graph = fixture_graph();
    let itinerary = cheapest_direct_flight(&graph, "Zagreb", "Porto").expect("direct flight");
    assert_eq!(itinerary.query, RouteQuery::CheapestDirect);
    assert_eq!(itinerary.hops(), 1);
    assert_eq!(carriers(&itinerary), vec!["Croatia Airlines"]);
    assert_eq!(itinerary.total_price, 320.0);
}

#[test]
fn no_direct_flight_is_not_found() {
    let graph = fixture_graph();
    let err = cheapest_direct_flight(&graph, "Porto", "Zagreb").unwrap_err();
    assert!(matches!(err, Error::NotFound { .. }));
    assert!(err.is_expected());
}

#[test]
fn cheapest_route_widens_with_more_days() {
    let graph = fixture_graph();

    let one_day = cheapest_route(&graph, "Zagreb", "Porto", 1).expect("route");
    assert_eq!(one_day.airports(), vec!["ZAG", "FRA", "OPO"]);
    assert_eq!(one_day.total_price, 190.0);

    let two_days = cheapest_route(&graph, "Zagreb", "Porto", 2).expect("route");
    assert_eq!(two_days.airports(), vec!["ZAG", "MAD", "OPO"]);
    assert_eq!(two_days.total_price, 100.0);
}

#[test]
fn fastest_route_skips_time_travel_connection() {
    let graph = fixture_graph();
    let itinerary = fastest_route(&graph, "Zagreb", "Porto", 1).expect("route");
    assert_eq!(carriers(&itinerary), vec!["Lufthansa", "Lufthansa"]);
    assert_eq!(itinerary.total_duration_minutes, 240);
    assert_eq!(itinerary.weight, 240.0);
}

#[test]
fn city_route_reports_nearest_airport() {
    let graph = fixture_graph();
    let itinerary = cheapest_route(&graph, "Cakovec", "Porto", 1).expect("route");
    assert_eq!(itinerary.airports(), vec!["VZN", "ZAG", "FRA", "OPO"]);
    assert_eq!(itinerary.total_price, 220.0);

    let via = itinerary.departure.via.as_ref().expect("nearest edge");
    assert_eq!(via.airport, "VZN");
    assert_eq!(via.distance_km, 200.0);
    assert!(itinerary.destination.via.is_none());
}

#[test]
fn three_hop_route_to_lisbon() {
    let graph = fixture_graph();
    let itinerary = cheapest_route(&graph, "Zagreb", "Lisbon", 1).expect("route");
    assert_eq!(itinerary.hops(), 3);
    assert_eq!(itinerary.total_price, 235.0);
    assert_eq!(itinerary.airports(), vec!["ZAG", "FRA", "OPO", "LIS"]);
}

#[test]
fn resolution_failures_surface_as_errors() {
    let graph = fixture_graph();

    let err = cheapest_route(&graph, "Atlantis", "Porto", 1).unwrap_err();
    assert!(matches!(err, Error::UnknownPlace { ref name, .. } if name == "Atlantis"));
    assert!(!err.is_expected());

    let err = cheapest_route(&graph, "Zagreb", "Krk", 1).unwrap_err();
    assert!(matches!(err, Error::NoReachableAirport { ref city } if city == "Krk"));
}

fn zagreb_porto_graph() -> FlightGraph {
    let mut builder = GraphBuilder::new();
    {
        let graph = builder.graph_mut();
        graph.add_airport("ZAG", "Zagreb", "Croatia").unwrap();
        graph.add_airport("FRA", "Frankfurt", "Germany").unwrap();
        graph.add_airport("OPO", "Porto", "Portugal").unwrap();
    }
    builder.flight("ZAG", "OPO", june(1, 6, 0), june(1, 16, 0), 300.0);
    builder.flight("ZAG", "FRA", june(1, 20, 0), june(1, 21, 0), 90.0);
    builder.flight("FRA", "OPO", june(2, 7, 0), june(2, 9, 0), 90.0);
    builder.build()
}

#[test]
fn overnight_connection_needs_two_days() {
    let graph = zagreb_porto_graph();

    let one_day = fastest_route(&graph, "Zagreb", "Porto", 1).expect("route");
    assert_eq!(one_day.airports(), vec!["ZAG", "OPO"]);
    assert_eq!(one_day.total_duration_minutes, 600);

    let two_days = fastest_route(&graph, "Zagreb", "Porto", 2).expect("route");
    assert_eq!(two_days.airports(), vec!["ZAG", "FRA", "OPO"]);
    assert_eq!(two_days.total_duration_minutes, 180);
}

#[test]
fn hop_limit_applies_through_request() {
    let graph = fixture_graph();
    let request = RouteRequest::cheapest("Zagreb", "Porto", 2)
        .with_limits(SearchLimits::default().with_max_hops(1));
    let itinerary = plan_route(&graph, &request).expect("route");
    assert_eq!(itinerary.hops(), 1);
    assert_eq!(itinerary.total_price, 320.0);
}

#[test]
fn expired_deadline_cancels_search() {
    let graph = fixture_graph();
    let request = RouteRequest::fastest("Zagreb", "Lisbon", 3)
        .with_limits(SearchLimits::default().with_deadline(Instant::now()));
    let err = plan_route(&graph, &request).unwrap_err();
    assert!(matches!(err, Error::Cancelled { .. }));
    assert!(err.is_expected());
}

#[test]
fn cancel_flag_stops_search() {
    let graph = fixture_graph();
    let cancel = CancelFlag::new();
    cancel.cancel();
    let request = RouteRequest::cheapest("Zagreb", "Porto", 1)
        .with_limits(SearchLimits::default().with_cancel(cancel));
    let err = plan_route(&graph, &request).unwrap_err();
    assert!(matches!(err, Error::Cancelled { .. }));
}

#[test]
fn cheapest_direct_tie_goes_to_earlier_departure_not_insertion() {
    let mut builder = GraphBuilder::new().airports(&["ZAG", "OPO"]);
    builder.flight("ZAG", "OPO", june(1, 10, 0), june(1, 13, 0), 150.0);
    let early = builder.flight("ZAG", "OPO", june(1, 7, 0), june(1, 10, 0), 150.0);
    let graph = builder.build();

    let itinerary = cheapest_direct_flight(&graph, "ZAG", "OPO").expect("direct flight");
    assert_eq!(itinerary.flights[0].id, early);
    assert_eq!(itinerary.departure_time(), Some(june(1, 7, 0)));
}

fn london_graph() -> FlightGraph {
    let mut builder = GraphBuilder::new();
    {
        let graph = builder.graph_mut();
        graph.add_airport("LHR", "London", "United Kingdom").unwrap();
        graph.add_airport("LGW", "London", "United Kingdom").unwrap();
        graph.add_airport("ZAG", "Zagreb", "Croatia").unwrap();
    }
    builder.flight("LHR", "ZAG", june(1, 8, 0), june(1, 11, 0), 120.0);
    builder.flight("LGW", "ZAG", june(1, 9, 0), june(1, 12, 0), 80.0);
    builder.flight("ZAG", "LHR", june(1, 13, 0), june(1, 15, 0), 60.0);
    builder.flight("ZAG", "LGW", june(1, 14, 0), june(1, 16, 0), 90.0);
    builder.build()
}

#[test]
fn multi_airport_city_searches_every_airport() {
    let graph = london_graph();

    let resolved = resolve_place(&graph, "london").expect("resolves");
    assert_eq!(resolved.airports, vec!["LGW", "LHR"]);
    assert!(resolved.via.is_none());

    let outbound = cheapest_route(&graph, "London", "Zagreb", 1).expect("route");
    assert_eq!(outbound.airports(), vec!["LGW", "ZAG"]);
    assert_eq!(outbound.total_price, 80.0);
    assert_eq!(outbound.departure.airports, vec!["LGW", "LHR"]);

    let inbound = cheapest_route(&graph, "Zagreb", "London", 1).expect("route");
    assert_eq!(inbound.airports(), vec!["ZAG", "LHR"]);
    assert_eq!(inbound.total_price, 60.0);
}

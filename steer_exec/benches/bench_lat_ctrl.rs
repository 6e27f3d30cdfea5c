//! # Lateral Control Benchmark

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use steer_lib::{
    lat_ctrl::{self, DesiredPath, InputData, LatControl, LatCtrlTorque, LocEstimate, VehicleState},
    vehicle_model::{Params, SingleTrackModel},
};
use util::store::MemParamStore;

fn lat_ctrl_benchmark(c: &mut Criterion) {
    let vm = SingleTrackModel::new(Params {
        steer_ratio: 15.0,
        wheelbase_m: 2.7,
        slip_factor: -0.0005,
    });

    let input = InputData {
        active: true,
        vehicle: VehicleState {
            v_ego_ms: 20.0,
            steering_angle_deg: -3.0,
            ..Default::default()
        },
        road: Default::default(),
        desired: DesiredPath {
            curvature_m: 0.002,
            curvature_rate_ms: 0.0001,
        },
        loc: LocEstimate {
            yaw_rate_rads: 0.03,
        },
    };

    // Yaw rate blending
    let params = lat_ctrl::Params {
        use_steering_angle: false,
        ..Default::default()
    };
    let mut ctrl = LatCtrlTorque::new(params, MemParamStore::new()).unwrap();

    c.bench_function("LatCtrlTorque::update", |b| {
        b.iter(|| ctrl.update(black_box(&input), &vm))
    });

    // Reading a complete stored tuning
    let mut store = MemParamStore::new();
    store.put_bool(lat_ctrl::KEY_CUSTOM_LATERAL_TUNE, true);
    store.put(lat_ctrl::KEY_TORQUE_MAX_LAT_ACCEL, "25");
    store.put(lat_ctrl::KEY_TORQUE_FRICTION, "10");

    c.bench_function("lat_ctrl::read_tuning", |b| {
        b.iter(|| lat_ctrl::read_tuning(black_box(&store)).unwrap())
    });
}

criterion_group!(benches, lat_ctrl_benchmark);
criterion_main!(benches);

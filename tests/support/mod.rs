pub mod mock_devices;

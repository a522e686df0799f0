mod mock_ports;
